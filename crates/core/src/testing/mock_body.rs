//! Mock work body for testing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::work::{WorkBody, WorkError, WorkItem};

/// A recorded body execution for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRun {
    /// The item that was executed.
    pub item: WorkItem,
    /// When the body started.
    pub started_at: DateTime<Utc>,
}

/// Mock implementation of the `WorkBody` trait.
///
/// Provides controllable behavior for testing:
/// - Record executed items, in order, for assertions
/// - Simulate work duration
/// - Inject failures, one-shot or per item id
#[derive(Clone)]
pub struct MockWorkBody {
    runs: Arc<RwLock<Vec<RecordedRun>>>,
    duration: Arc<RwLock<Duration>>,
    next_error: Arc<RwLock<Option<WorkError>>>,
    failing_items: Arc<RwLock<Vec<String>>>,
}

impl Default for MockWorkBody {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWorkBody {
    pub fn new() -> Self {
        Self {
            runs: Arc::new(RwLock::new(Vec::new())),
            duration: Arc::new(RwLock::new(Duration::from_millis(0))),
            next_error: Arc::new(RwLock::new(None)),
            failing_items: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set how long each body execution takes.
    pub async fn set_run_duration(&self, duration: Duration) {
        *self.duration.write().await = duration;
    }

    /// Configure the next execution to fail with the given error.
    pub async fn set_next_error(&self, error: WorkError) {
        *self.next_error.write().await = Some(error);
    }

    /// Fail every item whose id contains the given fragment.
    pub async fn fail_items_matching(&self, fragment: impl Into<String>) {
        self.failing_items.write().await.push(fragment.into());
    }

    /// Get recorded executions, in order.
    pub async fn recorded_runs(&self) -> Vec<RecordedRun> {
        self.runs.read().await.clone()
    }

    /// Number of executions performed.
    pub async fn run_count(&self) -> usize {
        self.runs.read().await.len()
    }
}

#[async_trait]
impl WorkBody for MockWorkBody {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, item: &WorkItem) -> Result<(), WorkError> {
        self.runs.write().await.push(RecordedRun {
            item: item.clone(),
            started_at: Utc::now(),
        });

        let duration = *self.duration.read().await;
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let failing = self.failing_items.read().await;
        if failing.iter().any(|fragment| item.id.contains(fragment)) {
            return Err(WorkError::BodyFailed(format!(
                "injected failure for {}",
                item.id
            )));
        }

        Ok(())
    }
}
