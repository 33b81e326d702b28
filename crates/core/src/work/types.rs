//! Core work item data types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constraints::ConstraintSet;

/// Input data key under which a work item carries its correlation id.
pub const INPUT_KEY_CORRELATION_ID: &str = "correlation_id";

/// Error type for work execution.
#[derive(Debug, Error)]
pub enum WorkError {
    /// The work body reported a failure.
    #[error("work body failed: {0}")]
    BodyFailed(String),

    /// The constraint probe could not be constructed.
    #[error("probe setup failed: {0}")]
    ProbeSetup(String),
}

/// A unit of background work.
///
/// Immutable once submitted: the executor owns execution state but never
/// mutates identity or input data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique id of this item within its chain.
    pub id: String,
    /// Opaque input data handed to the work body.
    pub input_data: HashMap<String, String>,
    /// Preconditions gating execution.
    pub constraints: ConstraintSet,
}

impl WorkItem {
    /// The correlation id carried in the input data, if present.
    pub fn correlation_id(&self) -> Option<&str> {
        self.input_data
            .get(INPUT_KEY_CORRELATION_ID)
            .map(String::as_str)
    }
}

/// Final, non-retried outcome of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalStatus {
    Succeeded,
    Failed,
}

impl TerminalStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, TerminalStatus::Succeeded)
    }
}

/// Terminal record of a single stage execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageOutcome {
    /// Terminal status of the work body.
    pub status: TerminalStatus,
    /// When the body started executing (after constraints were satisfied).
    pub started_at: DateTime<Utc>,
    /// When the body reached its terminal status.
    pub finished_at: DateTime<Utc>,
}
