//! Stock work body.

use std::time::Duration;

use async_trait::async_trait;
use bellhop_core::{WorkBody, WorkError, WorkItem};
use tracing::debug;

/// Work body that simulates a unit of background work by sleeping for a
/// configured duration before succeeding. The actual transport executing a
/// work item's payload is a deployment concern; this body keeps the pipeline
/// exercising end to end without one.
pub struct DelayBody {
    delay: Duration,
}

impl DelayBody {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl WorkBody for DelayBody {
    fn name(&self) -> &str {
        "delay"
    }

    async fn run(&self, item: &WorkItem) -> Result<(), WorkError> {
        debug!("Simulating work for item {} ({:?})", item.id, self.delay);
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}
