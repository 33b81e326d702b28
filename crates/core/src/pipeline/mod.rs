//! Pipeline chains and the orchestrator that drives them.
//!
//! A chain is an explicit ordered list of three work items; the orchestrator
//! enforces that a stage never starts before its predecessor is terminal,
//! surfaces terminal successes, and spawns the notifier processes.

mod chain;
mod orchestrator;
mod types;

pub use chain::{PipelineChain, STAGE_COUNT};
pub use orchestrator::PipelineOrchestrator;
pub use types::{
    ChainReport, NotifierReport, OrchestratorConfig, PipelineError, StageReport, StageStatus,
};
