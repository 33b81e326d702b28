//! Log-backed status display.
//!
//! Stands in for a platform notification surface: every display operation is
//! rendered as a structured log line. Countdown updates land at debug level
//! so a running countdown does not flood the log at default filtering.

use bellhop_core::{ChannelPriority, DisplayContent, DisplayError, StatusDisplay};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogDisplay;

impl LogDisplay {
    pub fn new() -> Self {
        Self
    }
}

impl StatusDisplay for LogDisplay {
    fn register_channel(
        &self,
        id: &str,
        name: &str,
        priority: ChannelPriority,
    ) -> Result<(), DisplayError> {
        info!(
            target: "bellhop::display",
            "Channel registered: {} ({}, {:?})",
            id, name, priority
        );
        Ok(())
    }

    fn show(&self, notification_id: u32, content: &DisplayContent) -> Result<(), DisplayError> {
        info!(
            target: "bellhop::display",
            "Show #{} on channel {}: {} / {}",
            notification_id, content.channel_id, content.title, content.body
        );
        Ok(())
    }

    fn update(&self, notification_id: u32, content: &DisplayContent) -> Result<(), DisplayError> {
        debug!(
            target: "bellhop::display",
            "Update #{}: {}",
            notification_id, content.body
        );
        Ok(())
    }

    fn dismiss(&self, notification_id: u32) -> Result<(), DisplayError> {
        info!(target: "bellhop::display", "Dismiss #{}", notification_id);
        Ok(())
    }
}
