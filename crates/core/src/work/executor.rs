//! Work item executor.
//!
//! Runs a single work item: holds it pending until its constraints are
//! satisfied, then executes the opaque work body exactly once and reports the
//! terminal outcome. Sequencing across items of a chain is owned by the
//! pipeline orchestrator, which drives one executor call at a time.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use crate::metrics;

use super::constraints::ConstraintProbe;
use super::types::{StageOutcome, TerminalStatus, WorkError, WorkItem};

/// The opaque collaborator that executes a work item's body.
#[async_trait]
pub trait WorkBody: Send + Sync {
    /// Name of this body implementation.
    fn name(&self) -> &str;

    /// Executes the item's body. An error maps to a `Failed` terminal status.
    async fn run(&self, item: &WorkItem) -> Result<(), WorkError>;
}

/// Executes work items under their declared constraints.
pub struct WorkItemExecutor {
    body: Arc<dyn WorkBody>,
    probe: Arc<dyn ConstraintProbe>,
    poll_interval: Duration,
}

impl WorkItemExecutor {
    pub fn new(
        body: Arc<dyn WorkBody>,
        probe: Arc<dyn ConstraintProbe>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            body,
            probe,
            poll_interval,
        }
    }

    /// Blocks until the item's constraints are satisfied.
    ///
    /// An unmet constraint is a hold state, never a failure: the item stays
    /// pending and the probe is re-evaluated once per poll interval.
    pub async fn wait_for_constraints(&self, item: &WorkItem) {
        loop {
            if self.probe.satisfied(&item.constraints).await {
                return;
            }
            debug!(
                "Constraints unmet for item {}, re-evaluating in {:?}",
                item.id, self.poll_interval
            );
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Executes the body of an item whose constraints are already satisfied.
    pub async fn execute(&self, item: &WorkItem) -> StageOutcome {
        let started_at = Utc::now();
        debug!("Executing work item {} via {}", item.id, self.body.name());

        let status = match self.body.run(item).await {
            Ok(()) => TerminalStatus::Succeeded,
            Err(e) => {
                warn!("Work item {} failed: {}", item.id, e);
                TerminalStatus::Failed
            }
        };

        let finished_at = Utc::now();
        metrics::STAGES_TOTAL
            .with_label_values(&[match status {
                TerminalStatus::Succeeded => "succeeded",
                TerminalStatus::Failed => "failed",
            }])
            .inc();
        metrics::STAGE_DURATION
            .observe((finished_at - started_at).num_milliseconds().max(0) as f64 / 1000.0);

        StageOutcome {
            status,
            started_at,
            finished_at,
        }
    }

    /// Runs an item end to end: constraint wait followed by body execution.
    pub async fn run(&self, item: &WorkItem) -> StageOutcome {
        self.wait_for_constraints(item).await;
        self.execute(item).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;
    use crate::work::constraints::{AlwaysSatisfied, ConstraintSet};

    struct CountingBody {
        runs: AtomicU64,
        fail: bool,
    }

    #[async_trait]
    impl WorkBody for CountingBody {
        fn name(&self) -> &str {
            "counting"
        }

        async fn run(&self, _item: &WorkItem) -> Result<(), WorkError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(WorkError::BodyFailed("injected".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn item() -> WorkItem {
        WorkItem {
            id: "test-stage1".to_string(),
            input_data: HashMap::new(),
            constraints: ConstraintSet::none(),
        }
    }

    #[tokio::test]
    async fn test_successful_run() {
        let body = Arc::new(CountingBody {
            runs: AtomicU64::new(0),
            fail: false,
        });
        let executor = WorkItemExecutor::new(
            Arc::clone(&body) as Arc<dyn WorkBody>,
            Arc::new(AlwaysSatisfied),
            Duration::from_millis(10),
        );

        let outcome = executor.run(&item()).await;
        assert_eq!(outcome.status, TerminalStatus::Succeeded);
        assert!(outcome.finished_at >= outcome.started_at);
        assert_eq!(body.runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_body_error_maps_to_failed() {
        let executor = WorkItemExecutor::new(
            Arc::new(CountingBody {
                runs: AtomicU64::new(0),
                fail: true,
            }),
            Arc::new(AlwaysSatisfied),
            Duration::from_millis(10),
        );

        let outcome = executor.run(&item()).await;
        assert_eq!(outcome.status, TerminalStatus::Failed);
    }
}
