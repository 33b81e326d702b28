//! Self-terminating notifier processes.
//!
//! A notifier process performs a timed countdown while keeping a persistent
//! status display, publishes its completion on a single-value broadcast
//! channel, and terminates itself. One reusable component covers every
//! parameterization (channel, countdown length, display text).

mod channel;
mod display;
mod process;
mod registry;
mod types;

pub use channel::{CompletionChannel, CompletionHub, CompletionSubscription};
pub use display::{ChannelPriority, DisplayContent, DisplayError, StatusDisplay};
pub use process::{NotifierHandle, NotifierProcess};
pub use registry::ChannelRegistry;
pub use types::{CompletionEvent, NotifierError, NotifierSpec, ProcessState};
