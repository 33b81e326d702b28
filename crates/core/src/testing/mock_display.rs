//! Mock status display for testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::notifier::{ChannelPriority, DisplayContent, DisplayError, StatusDisplay};

/// A recorded display operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    RegisterChannel {
        id: String,
        name: String,
    },
    Show {
        notification_id: u32,
        channel_id: String,
        title: String,
        body: String,
    },
    Update {
        notification_id: u32,
        body: String,
        silent: bool,
    },
    Dismiss {
        notification_id: u32,
    },
}

/// Mock implementation of the `StatusDisplay` trait.
///
/// Records every call (including failed attempts) and can be told to reject
/// registration or show operations. Uses plain `std` locking because it is
/// called from notifier countdown threads.
#[derive(Clone)]
pub struct MockDisplay {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
    fail_register: Arc<AtomicBool>,
    fail_show: Arc<AtomicBool>,
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_register: Arc::new(AtomicBool::new(false)),
            fail_show: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Reject subsequent channel registrations.
    pub fn set_fail_register(&self, fail: bool) {
        self.fail_register.store(fail, Ordering::SeqCst);
    }

    /// Reject subsequent show operations.
    pub fn set_fail_show(&self, fail: bool) {
        self.fail_show.store(fail, Ordering::SeqCst);
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<DisplayCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of updates recorded for one notification id.
    pub fn update_count(&self, notification_id: u32) -> usize {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(call, DisplayCall::Update { notification_id: id, .. } if *id == notification_id)
            })
            .count()
    }

    /// Bodies of all updates recorded for one notification id, in order.
    pub fn update_bodies(&self, notification_id: u32) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DisplayCall::Update {
                    notification_id: id,
                    body,
                    ..
                } if id == notification_id => Some(body),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: DisplayCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl StatusDisplay for MockDisplay {
    fn register_channel(
        &self,
        id: &str,
        name: &str,
        _priority: ChannelPriority,
    ) -> Result<(), DisplayError> {
        self.record(DisplayCall::RegisterChannel {
            id: id.to_string(),
            name: name.to_string(),
        });
        if self.fail_register.load(Ordering::SeqCst) {
            return Err(DisplayError::ChannelRegistration(
                "injected registration failure".to_string(),
            ));
        }
        Ok(())
    }

    fn show(&self, notification_id: u32, content: &DisplayContent) -> Result<(), DisplayError> {
        self.record(DisplayCall::Show {
            notification_id,
            channel_id: content.channel_id.clone(),
            title: content.title.clone(),
            body: content.body.clone(),
        });
        if self.fail_show.load(Ordering::SeqCst) {
            return Err(DisplayError::Rejected("injected show failure".to_string()));
        }
        Ok(())
    }

    fn update(&self, notification_id: u32, content: &DisplayContent) -> Result<(), DisplayError> {
        self.record(DisplayCall::Update {
            notification_id,
            body: content.body.clone(),
            silent: content.silent,
        });
        Ok(())
    }

    fn dismiss(&self, notification_id: u32) -> Result<(), DisplayError> {
        self.record(DisplayCall::Dismiss { notification_id });
        Ok(())
    }
}
