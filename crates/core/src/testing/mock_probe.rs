//! Mock constraint probe for testing.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::work::{ConstraintProbe, ConstraintSet};

/// Mock implementation of the `ConstraintProbe` trait.
///
/// Network reachability is a flag that tests flip at will; every evaluation
/// is counted so re-evaluation behavior can be asserted.
#[derive(Clone)]
pub struct MockConstraintProbe {
    network_up: Arc<AtomicBool>,
    evaluations: Arc<AtomicU64>,
}

impl Default for MockConstraintProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConstraintProbe {
    /// Create a probe reporting the network reachable.
    pub fn new() -> Self {
        Self {
            network_up: Arc::new(AtomicBool::new(true)),
            evaluations: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Flip network reachability.
    pub fn set_network(&self, up: bool) {
        self.network_up.store(up, Ordering::SeqCst);
    }

    /// Number of times `satisfied` was evaluated.
    pub fn evaluation_count(&self) -> u64 {
        self.evaluations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConstraintProbe for MockConstraintProbe {
    fn name(&self) -> &str {
        "mock"
    }

    async fn satisfied(&self, constraints: &ConstraintSet) -> bool {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        !constraints.network || self.network_up.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_network_flag() {
        let probe = MockConstraintProbe::new();
        let constraints = ConstraintSet::network_required();

        assert!(probe.satisfied(&constraints).await);
        probe.set_network(false);
        assert!(!probe.satisfied(&constraints).await);
        assert!(probe.satisfied(&ConstraintSet::none()).await);

        assert_eq!(probe.evaluation_count(), 3);
    }
}
