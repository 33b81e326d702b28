//! Completion channel: a single-value broadcast primitive.
//!
//! Each notifier process publishes its completion event on one of these.
//! Semantics: at most one unconsumed value is retained; a new publish
//! overwrites an unconsumed prior value; every subscription receives the
//! latest value at subscribe time (if any) and each subsequent publish,
//! exactly once per publish. Publishing is allowed from any thread; delivery
//! happens on whichever task awaits [`CompletionSubscription::recv`], so
//! observers are never re-entered from the publisher's context.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::debug;

use super::types::CompletionEvent;

/// Retained channel value plus a publish counter.
///
/// The counter lets a subscription distinguish "value I have already
/// consumed" from "fresh publish", independent of the event payload.
#[derive(Debug, Clone)]
struct Slot {
    seq: u64,
    event: Option<CompletionEvent>,
}

/// A single-value broadcast channel for completion events.
#[derive(Debug)]
pub struct CompletionChannel {
    tx: watch::Sender<Slot>,
}

impl CompletionChannel {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Slot {
            seq: 0,
            event: None,
        });
        Self { tx }
    }

    /// Publishes an event, overwriting any unconsumed prior value.
    ///
    /// Callable from any thread, including notifier countdown threads.
    pub fn publish(&self, event: CompletionEvent) {
        debug!(
            "Publishing completion for process {} (value {})",
            event.process_id, event.value
        );
        self.tx.send_modify(|slot| {
            slot.seq += 1;
            slot.event = Some(event);
        });
    }

    /// Creates a subscription that replays the latest retained value once,
    /// then yields each subsequent publish.
    pub fn subscribe(&self) -> CompletionSubscription {
        CompletionSubscription {
            rx: self.tx.subscribe(),
            last_seen: 0,
        }
    }
}

impl Default for CompletionChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered observer of a completion channel.
pub struct CompletionSubscription {
    rx: watch::Receiver<Slot>,
    last_seen: u64,
}

impl CompletionSubscription {
    /// Receives the next unconsumed event.
    ///
    /// Resolves immediately if a value this subscription has not yet seen is
    /// retained; otherwise waits for the next publish. Returns `None` once
    /// the channel is closed and fully drained.
    pub async fn recv(&mut self) -> Option<CompletionEvent> {
        loop {
            let unseen = {
                let slot = self.rx.borrow_and_update();
                if slot.seq > self.last_seen {
                    Some((slot.seq, slot.event.clone()))
                } else {
                    None
                }
            };

            if let Some((seq, event)) = unseen {
                self.last_seen = seq;
                if let Some(event) = event {
                    return Some(event);
                }
                continue;
            }

            if self.rx.changed().await.is_err() {
                return None;
            }
        }
    }
}

/// Registry of completion channels, keyed by external process id.
///
/// Channels are created on first use and are per process instance, not
/// shared singletons: two pipeline runs reusing a process id overwrite each
/// other only through the documented single-value semantics.
#[derive(Debug, Default)]
pub struct CompletionHub {
    channels: RwLock<HashMap<String, Arc<CompletionChannel>>>,
}

impl CompletionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the channel for a process id, creating it if needed.
    pub async fn channel(&self, process_id: &str) -> Arc<CompletionChannel> {
        {
            let channels = self.channels.read().await;
            if let Some(channel) = channels.get(process_id) {
                return Arc::clone(channel);
            }
        }

        let mut channels = self.channels.write().await;
        Arc::clone(
            channels
                .entry(process_id.to_string())
                .or_insert_with(|| Arc::new(CompletionChannel::new())),
        )
    }

    /// Subscribes to a process's channel, creating the channel if needed.
    pub async fn subscribe(&self, process_id: &str) -> CompletionSubscription {
        self.channel(process_id).await.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str) -> CompletionEvent {
        CompletionEvent {
            process_id: id.to_string(),
            value: id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_publish() {
        let channel = CompletionChannel::new();
        let mut sub = channel.subscribe();

        channel.publish(event("001"));

        let received = sub.recv().await.unwrap();
        assert_eq!(received.process_id, "001");
        assert_eq!(received.value, "001");
    }

    #[tokio::test]
    async fn test_late_subscriber_replays_last_value_once() {
        let channel = CompletionChannel::new();
        channel.publish(event("001"));

        let mut sub = channel.subscribe();
        assert_eq!(sub.recv().await.unwrap().process_id, "001");

        // The value was consumed; recv must now be pending.
        let mut fut = tokio_test::task::spawn(sub.recv());
        tokio_test::assert_pending!(fut.poll());
    }

    #[tokio::test]
    async fn test_no_delivery_without_publish() {
        let channel = CompletionChannel::new();
        let mut sub = channel.subscribe();

        let mut fut = tokio_test::task::spawn(sub.recv());
        tokio_test::assert_pending!(fut.poll());
    }

    #[tokio::test]
    async fn test_publish_overwrites_unconsumed_value() {
        let channel = CompletionChannel::new();
        let mut sub = channel.subscribe();

        channel.publish(event("first"));
        channel.publish(event("second"));

        // Only the latest value is retained.
        assert_eq!(sub.recv().await.unwrap().process_id, "second");
        let mut fut = tokio_test::task::spawn(sub.recv());
        tokio_test::assert_pending!(fut.poll());
    }

    #[tokio::test]
    async fn test_each_subscription_delivered_independently() {
        let channel = CompletionChannel::new();
        let mut first = channel.subscribe();
        let mut second = channel.subscribe();

        channel.publish(event("001"));

        assert_eq!(first.recv().await.unwrap().process_id, "001");
        assert_eq!(second.recv().await.unwrap().process_id, "001");
    }

    #[tokio::test]
    async fn test_reregistration_replays_exactly_once() {
        let channel = CompletionChannel::new();
        channel.publish(event("001"));

        let mut first = channel.subscribe();
        assert_eq!(first.recv().await.unwrap().process_id, "001");

        // A fresh registration gets the last value again, once.
        let mut second = channel.subscribe();
        assert_eq!(second.recv().await.unwrap().process_id, "001");
        let mut fut = tokio_test::task::spawn(second.recv());
        tokio_test::assert_pending!(fut.poll());
    }

    #[tokio::test]
    async fn test_recv_returns_none_when_channel_dropped() {
        let channel = CompletionChannel::new();
        let mut sub = channel.subscribe();
        drop(channel);

        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_publish_from_another_thread() {
        let channel = Arc::new(CompletionChannel::new());
        let mut sub = channel.subscribe();

        let publisher = Arc::clone(&channel);
        let handle = std::thread::spawn(move || {
            publisher.publish(event("001"));
        });

        assert_eq!(sub.recv().await.unwrap().process_id, "001");
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn test_hub_returns_same_channel_per_id() {
        let hub = CompletionHub::new();
        let a = hub.channel("001").await;
        let b = hub.channel("001").await;
        assert!(Arc::ptr_eq(&a, &b));

        let other = hub.channel("002").await;
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[tokio::test]
    async fn test_hub_subscribe_before_publish() {
        let hub = CompletionHub::new();
        let mut sub = hub.subscribe("001").await;

        hub.channel("001").await.publish(event("001"));

        assert_eq!(sub.recv().await.unwrap().process_id, "001");
    }
}
