//! Execution constraints and their evaluation.
//!
//! A [`ConstraintSet`] is a declarative precondition attached to a work item.
//! Whether it currently holds is decided by a [`ConstraintProbe`], which the
//! executor re-evaluates on a fixed interval while an item is held pending.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::WorkError;

/// Declarative preconditions for running a work item.
///
/// An unmet constraint is a hold state, not a failure: the item stays pending
/// until re-evaluation reports the constraint satisfied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSet {
    /// The item must not run while the network is unreachable.
    #[serde(default)]
    pub network: bool,
}

impl ConstraintSet {
    /// A constraint set requiring network reachability.
    pub fn network_required() -> Self {
        Self { network: true }
    }

    /// An empty constraint set; always satisfied.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether this set imposes any condition at all.
    pub fn is_empty(&self) -> bool {
        !self.network
    }
}

/// Evaluates whether a constraint set currently holds.
#[async_trait]
pub trait ConstraintProbe: Send + Sync {
    /// Name of this probe implementation.
    fn name(&self) -> &str;

    /// Returns true when every constraint in the set is currently satisfied.
    async fn satisfied(&self, constraints: &ConstraintSet) -> bool;
}

/// Probe that checks network reachability with an HTTP HEAD request.
///
/// Any response, including an error status, counts as reachable; only a
/// transport-level failure (DNS, connect, timeout) reports the network down.
pub struct HttpProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, WorkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WorkError::ProbeSetup(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ConstraintProbe for HttpProbe {
    fn name(&self) -> &str {
        "http"
    }

    async fn satisfied(&self, constraints: &ConstraintSet) -> bool {
        if !constraints.network {
            return true;
        }

        match self.client.head(&self.url).send().await {
            Ok(_) => true,
            Err(e) => {
                debug!("Network probe against {} failed: {}", self.url, e);
                false
            }
        }
    }
}

/// Probe that reports every constraint satisfied.
///
/// Used when no probe endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysSatisfied;

#[async_trait]
impl ConstraintProbe for AlwaysSatisfied {
    fn name(&self) -> &str {
        "always"
    }

    async fn satisfied(&self, _constraints: &ConstraintSet) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_required() {
        let constraints = ConstraintSet::network_required();
        assert!(constraints.network);
        assert!(!constraints.is_empty());
    }

    #[test]
    fn test_none_is_empty() {
        assert!(ConstraintSet::none().is_empty());
    }

    #[tokio::test]
    async fn test_always_satisfied() {
        let probe = AlwaysSatisfied;
        assert!(probe.satisfied(&ConstraintSet::network_required()).await);
        assert!(probe.satisfied(&ConstraintSet::none()).await);
    }

    #[tokio::test]
    async fn test_http_probe_skips_empty_set() {
        // No request is made for an empty constraint set, so an unroutable
        // URL must not matter.
        let probe =
            HttpProbe::new("http://192.0.2.1:1", Duration::from_millis(100)).unwrap();
        assert!(probe.satisfied(&ConstraintSet::none()).await);
    }

    #[test]
    fn test_constraint_set_serialization() {
        let json = serde_json::to_string(&ConstraintSet::network_required()).unwrap();
        assert_eq!(json, "{\"network\":true}");
    }
}
