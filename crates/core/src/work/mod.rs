//! Work items, execution constraints, and the item executor.

mod constraints;
mod executor;
mod types;

pub use constraints::{AlwaysSatisfied, ConstraintProbe, ConstraintSet, HttpProbe};
pub use executor::{WorkBody, WorkItemExecutor};
pub use types::{StageOutcome, TerminalStatus, WorkError, WorkItem, INPUT_KEY_CORRELATION_ID};
