//! Presentation surface for user-visible status messages.
//!
//! The orchestrator never renders anything; it hands fire-and-forget status
//! messages to a host-provided presenter.

use tracing::info;

/// Host-side presentation surface.
pub trait Presenter: Send + Sync {
    /// Surfaces a user-visible status message. Fire-and-forget.
    fn surface(&self, message: &str);
}

/// Presenter that writes surfaced messages to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn surface(&self, message: &str) {
        info!(target: "bellhop::surface", "{}", message);
    }
}
