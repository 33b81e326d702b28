//! Pipeline chain construction.

use std::collections::HashMap;

use uuid::Uuid;

use crate::work::{ConstraintSet, WorkItem, INPUT_KEY_CORRELATION_ID};

use super::types::PipelineError;

/// Number of stages in a pipeline chain.
pub const STAGE_COUNT: usize = 3;

/// An ordered sequence of work items with run-after-predecessor-terminal
/// semantics.
///
/// Created once at submission time and immutable afterwards; the orchestrator
/// enforces the ordering invariant while driving it.
#[derive(Debug, Clone)]
pub struct PipelineChain {
    /// Internal chain id, unique per submission.
    pub chain_id: String,
    /// External correlation id carried by every stage.
    pub correlation_id: String,
    /// The stages, in execution order.
    pub items: Vec<WorkItem>,
}

impl PipelineChain {
    /// Builds a three-stage chain correlated by `correlation_id`.
    ///
    /// Every stage requires network reachability and carries the correlation
    /// id in its input data. An empty id is a configuration error and no
    /// chain is produced.
    pub fn build(correlation_id: &str) -> Result<Self, PipelineError> {
        if correlation_id.trim().is_empty() {
            return Err(PipelineError::Configuration(
                "correlation id must not be empty".to_string(),
            ));
        }

        let chain_id = Uuid::new_v4().to_string();
        let items = (1..=STAGE_COUNT)
            .map(|n| WorkItem {
                id: format!("{}-stage{}", chain_id, n),
                input_data: HashMap::from([(
                    INPUT_KEY_CORRELATION_ID.to_string(),
                    correlation_id.to_string(),
                )]),
                constraints: ConstraintSet::network_required(),
            })
            .collect();

        Ok(Self {
            chain_id,
            correlation_id: correlation_id.to_string(),
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_produces_three_stages() {
        let chain = PipelineChain::build("001").unwrap();

        assert_eq!(chain.correlation_id, "001");
        assert_eq!(chain.items.len(), STAGE_COUNT);
        for item in &chain.items {
            assert_eq!(item.correlation_id(), Some("001"));
            assert!(item.constraints.network);
        }
    }

    #[test]
    fn test_stage_ids_are_distinct_and_ordered() {
        let chain = PipelineChain::build("001").unwrap();

        let ids: Vec<&str> = chain.items.iter().map(|i| i.id.as_str()).collect();
        assert!(ids[0].ends_with("-stage1"));
        assert!(ids[1].ends_with("-stage2"));
        assert!(ids[2].ends_with("-stage3"));
    }

    #[test]
    fn test_empty_correlation_id_rejected() {
        let result = PipelineChain::build("");
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }

    #[test]
    fn test_whitespace_correlation_id_rejected() {
        let result = PipelineChain::build("   ");
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }

    #[test]
    fn test_chains_get_distinct_ids() {
        let a = PipelineChain::build("001").unwrap();
        let b = PipelineChain::build("001").unwrap();
        assert_ne!(a.chain_id, b.chain_id);
    }
}
