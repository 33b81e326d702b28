//! Types for the notifier module.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in a notifier process.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// The process was started without its required external id.
    #[error("notifier process requires a non-empty external id")]
    MissingId,

    /// The countdown thread could not be spawned.
    #[error("failed to spawn countdown thread: {0}")]
    Spawn(String),
}

/// Parameters of a notifier process.
///
/// The process itself is a single reusable component; every deployment
/// difference (channel, countdown length, display text) lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierSpec {
    /// Display channel id, registered with the host once per id.
    pub channel_id: String,
    /// Human-readable channel name used at registration.
    pub channel_name: String,
    /// Title of the persistent display.
    pub display_title: String,
    /// Body shown before the first countdown tick.
    pub initial_body: String,
    /// Body template for countdown ticks; `{remaining}` is substituted.
    pub subtitle_template: String,
    /// Countdown starts here and runs down to zero inclusive.
    pub countdown_start: u32,
    /// Sleep between ticks.
    pub tick: Duration,
    /// Host-side id of the persistent display.
    pub notification_id: u32,
    /// Tap target attached to the display, pointing back at the host's
    /// primary entry point.
    pub tap_target: String,
}

impl NotifierSpec {
    /// Renders the countdown body for a remaining count.
    pub fn subtitle(&self, remaining: u32) -> String {
        self.subtitle_template
            .replace("{remaining}", &remaining.to_string())
    }
}

/// Lifecycle state of a notifier process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProcessState {
    Created,
    Initializing,
    Counting { remaining: u32 },
    Completed,
    Terminated,
}

impl ProcessState {
    /// Whether the process has released all its resources.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessState::Terminated)
    }
}

/// Completion event published by a notifier process, exactly once.
///
/// `process_id` is the externally supplied id carried through the process,
/// not an internal handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub process_id: String,
    pub value: String,
}
