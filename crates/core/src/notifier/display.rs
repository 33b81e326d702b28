//! Persistent status display contract.
//!
//! The core never renders anything itself; it drives a host-provided display
//! through this trait. The trait is synchronous because it is called from the
//! notifier countdown threads, which are plain OS threads.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for display operations.
///
/// Display failures are non-fatal throughout the core: they are logged and
/// the owning process continues.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// Channel could not be registered with the host.
    #[error("channel registration failed: {0}")]
    ChannelRegistration(String),

    /// The host rejected the display operation.
    #[error("display rejected by host: {0}")]
    Rejected(String),
}

/// Importance of a display channel, declared at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelPriority {
    Low,
    Default,
    High,
}

/// Content of a persistent status display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayContent {
    /// Channel the display is posted on.
    pub channel_id: String,
    pub title: String,
    pub body: String,
    /// Deep link back to the host's primary entry point.
    pub tap_target: Option<String>,
    /// Suppress re-alert sound/vibration on update.
    pub silent: bool,
    /// Dismiss-suppressed while true.
    pub ongoing: bool,
}

/// Host-side persistent display primitive.
pub trait StatusDisplay: Send + Sync {
    /// Registers a display channel. Registering an already-known id must be
    /// accepted by the host; callers additionally dedupe through
    /// [`crate::notifier::ChannelRegistry`].
    fn register_channel(
        &self,
        id: &str,
        name: &str,
        priority: ChannelPriority,
    ) -> Result<(), DisplayError>;

    /// Shows a persistent display.
    fn show(&self, notification_id: u32, content: &DisplayContent) -> Result<(), DisplayError>;

    /// Updates the content of a shown display.
    fn update(&self, notification_id: u32, content: &DisplayContent) -> Result<(), DisplayError>;

    /// Removes a display.
    fn dismiss(&self, notification_id: u32) -> Result<(), DisplayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DisplayError::Rejected("no permission".to_string());
        assert_eq!(err.to_string(), "display rejected by host: no permission");
    }

    #[test]
    fn test_channel_priority_serialization() {
        let json = serde_json::to_string(&ChannelPriority::Default).unwrap();
        assert_eq!(json, "\"default\"");
    }
}
