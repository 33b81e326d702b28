//! Types for the pipeline module.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notifier::{NotifierSpec, ProcessState};
use crate::work::TerminalStatus;

/// Errors that can occur when building or submitting a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid pipeline input, e.g. an empty correlation id.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A chain with this id has already been submitted.
    #[error("chain already submitted: {0}")]
    ChainExists(String),
}

/// Orchestrator parameters: the two notifier processes it spawns.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Spawned when stage 2 succeeds.
    pub first_notifier: NotifierSpec,
    /// Spawned when stage 3 succeeds.
    pub second_notifier: NotifierSpec,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            first_notifier: NotifierSpec {
                channel_id: "001".to_string(),
                channel_name: "001 Channel".to_string(),
                display_title: "Second worker process is done".to_string(),
                initial_body: "Check it out!".to_string(),
                subtitle_template: "{remaining} seconds until last warning".to_string(),
                countdown_start: 10,
                tick: Duration::from_secs(1),
                notification_id: 0xCA7,
                tap_target: "bellhop://home".to_string(),
            },
            second_notifier: NotifierSpec {
                channel_id: "002".to_string(),
                channel_name: "002 Channel".to_string(),
                display_title: "Third worker process is done".to_string(),
                initial_body: "Check it out!".to_string(),
                subtitle_template: "{remaining} seconds until final warning".to_string(),
                countdown_start: 5,
                tick: Duration::from_secs(1),
                notification_id: 0xCA8,
                tap_target: "bellhop://home".to_string(),
            },
        }
    }
}

/// Observable status of a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl StageStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StageStatus::Succeeded | StageStatus::Failed)
    }
}

impl From<TerminalStatus> for StageStatus {
    fn from(status: TerminalStatus) -> Self {
        match status {
            TerminalStatus::Succeeded => StageStatus::Succeeded,
            TerminalStatus::Failed => StageStatus::Failed,
        }
    }
}

/// Report of a single stage of a chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    /// 1-based stage index.
    pub index: usize,
    /// Id of the underlying work item.
    pub item_id: String,
    pub status: StageStatus,
    /// When the body started executing (constraints already satisfied).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// When the stage reached a terminal status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Report of one submitted chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainReport {
    pub chain_id: String,
    pub correlation_id: String,
    pub stages: Vec<StageReport>,
}

impl ChainReport {
    /// Whether every stage has reached a terminal status.
    pub fn is_finished(&self) -> bool {
        self.stages.iter().all(|s| s.status.is_terminal())
    }
}

/// Report of one spawned notifier process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierReport {
    /// External process id.
    pub process_id: String,
    /// Display channel of the process.
    pub channel_id: String,
    pub state: ProcessState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parameterizations() {
        let config = OrchestratorConfig::default();

        assert_eq!(config.first_notifier.channel_id, "001");
        assert_eq!(config.first_notifier.countdown_start, 10);
        assert_eq!(config.first_notifier.notification_id, 0xCA7);

        assert_eq!(config.second_notifier.channel_id, "002");
        assert_eq!(config.second_notifier.countdown_start, 5);
        assert_eq!(config.second_notifier.notification_id, 0xCA8);
    }

    #[test]
    fn test_stage_status_from_terminal() {
        assert_eq!(
            StageStatus::from(TerminalStatus::Succeeded),
            StageStatus::Succeeded
        );
        assert_eq!(
            StageStatus::from(TerminalStatus::Failed),
            StageStatus::Failed
        );
    }

    #[test]
    fn test_error_display() {
        let err = PipelineError::Configuration("correlation id must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: correlation id must not be empty"
        );

        let err = PipelineError::ChainExists("abc".to_string());
        assert_eq!(err.to_string(), "chain already submitted: abc");
    }

    #[test]
    fn test_chain_report_finished() {
        let report = ChainReport {
            chain_id: "c".to_string(),
            correlation_id: "001".to_string(),
            stages: vec![StageReport {
                index: 1,
                item_id: "c-stage1".to_string(),
                status: StageStatus::Running,
                started_at: None,
                finished_at: None,
            }],
        };
        assert!(!report.is_finished());
    }
}
