//! Display channel registry.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::display::{ChannelPriority, DisplayError, StatusDisplay};

/// Process-wide registry of display channels.
///
/// Channel registration with the host happens exactly once per channel id;
/// repeat registrations with the same id are idempotent no-ops. Shared by all
/// notifier processes and safe to call from their countdown threads.
pub struct ChannelRegistry {
    display: Arc<dyn StatusDisplay>,
    registered: Mutex<HashSet<String>>,
}

impl ChannelRegistry {
    pub fn new(display: Arc<dyn StatusDisplay>) -> Self {
        Self {
            display,
            registered: Mutex::new(HashSet::new()),
        }
    }

    /// Registers the channel with the host unless it is already known.
    pub fn ensure(
        &self,
        id: &str,
        name: &str,
        priority: ChannelPriority,
    ) -> Result<(), DisplayError> {
        let mut registered = self
            .registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if registered.contains(id) {
            debug!("Display channel {} already registered", id);
            return Ok(());
        }

        self.display.register_channel(id, name, priority)?;
        registered.insert(id.to_string());
        debug!("Display channel registered: {}", id);
        Ok(())
    }

    /// Whether a channel id has been registered through this registry.
    pub fn is_registered(&self, id: &str) -> bool {
        self.registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }
}
