//! Notifier process state machine.
//!
//! A notifier process is a self-terminating background unit: it establishes a
//! persistent, dismiss-suppressed status display, runs a blocking countdown on
//! its own dedicated OS thread, publishes exactly one completion event on its
//! completion channel, removes the display, and stops. Once the countdown has
//! started it runs to completion; there is no cancellation.
//!
//! State transitions:
//! `Created -> Initializing -> Counting(n) -> Completed -> Terminated`.

use std::sync::Arc;
use std::thread;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::metrics;

use super::channel::CompletionChannel;
use super::display::{ChannelPriority, DisplayContent, StatusDisplay};
use super::registry::ChannelRegistry;
use super::types::{CompletionEvent, NotifierError, NotifierSpec, ProcessState};

/// A notifier process in its `Created` state.
pub struct NotifierProcess {
    spec: NotifierSpec,
    external_id: String,
    display: Arc<dyn StatusDisplay>,
    registry: Arc<ChannelRegistry>,
    channel: Arc<CompletionChannel>,
    state_tx: watch::Sender<ProcessState>,
    state_rx: watch::Receiver<ProcessState>,
}

impl NotifierProcess {
    /// Creates a process with a caller-supplied external id.
    ///
    /// The id must be non-empty; a process without one never starts and in
    /// particular never reaches `Counting`.
    pub fn new(
        spec: NotifierSpec,
        external_id: impl Into<String>,
        display: Arc<dyn StatusDisplay>,
        registry: Arc<ChannelRegistry>,
        channel: Arc<CompletionChannel>,
    ) -> Result<Self, NotifierError> {
        let external_id = external_id.into();
        if external_id.trim().is_empty() {
            return Err(NotifierError::MissingId);
        }

        let (state_tx, state_rx) = watch::channel(ProcessState::Created);
        Ok(Self {
            spec,
            external_id,
            display,
            registry,
            channel,
            state_tx,
            state_rx,
        })
    }

    /// The process's lifecycle state, observable from any task.
    pub fn state(&self) -> watch::Receiver<ProcessState> {
        self.state_rx.clone()
    }

    /// Initializes the persistent display and starts the countdown thread.
    ///
    /// Display setup is best-effort: registration or show failures are logged
    /// and the countdown proceeds regardless.
    pub fn start(self) -> Result<NotifierHandle, NotifierError> {
        self.state_tx.send_replace(ProcessState::Initializing);
        info!(
            "Starting notifier process {} (channel {}, countdown from {})",
            self.external_id, self.spec.channel_id, self.spec.countdown_start
        );

        if let Err(e) = self.registry.ensure(
            &self.spec.channel_id,
            &self.spec.channel_name,
            ChannelPriority::Default,
        ) {
            warn!(
                "Channel registration failed for process {}: {}",
                self.external_id, e
            );
        }

        let content = DisplayContent {
            channel_id: self.spec.channel_id.clone(),
            title: self.spec.display_title.clone(),
            body: self.spec.initial_body.clone(),
            tap_target: Some(self.spec.tap_target.clone()),
            silent: false,
            ongoing: true,
        };

        if let Err(e) = self.display.show(self.spec.notification_id, &content) {
            warn!(
                "Could not start persistent display for process {}: {}",
                self.external_id, e
            );
        }

        let state = self.state_rx.clone();
        let thread_name = format!("notifier-{}", self.spec.channel_id);
        let thread = thread::Builder::new()
            .name(thread_name)
            .spawn(move || self.run_countdown(content))
            .map_err(|e| NotifierError::Spawn(e.to_string()))?;

        Ok(NotifierHandle {
            state,
            thread: Some(thread),
        })
    }

    /// The blocking countdown loop. Runs on the process's dedicated thread,
    /// never on the caller's context.
    fn run_countdown(self, mut content: DisplayContent) {
        for remaining in (0..=self.spec.countdown_start).rev() {
            thread::sleep(self.spec.tick);
            self.state_tx
                .send_replace(ProcessState::Counting { remaining });

            content.body = self.spec.subtitle(remaining);
            content.silent = true;
            if let Err(e) = self.display.update(self.spec.notification_id, &content) {
                warn!(
                    "Display update failed for process {}: {}",
                    self.external_id, e
                );
            }
            metrics::NOTIFIER_TICKS.inc();
            debug!("Countdown for process {}: {}", self.external_id, remaining);
        }

        self.state_tx.send_replace(ProcessState::Completed);
        self.channel.publish(CompletionEvent {
            process_id: self.external_id.clone(),
            value: self.external_id.clone(),
        });
        metrics::NOTIFIER_COMPLETIONS
            .with_label_values(&[&self.spec.channel_id])
            .inc();
        info!("Notifier process {} completed", self.external_id);

        if let Err(e) = self.display.dismiss(self.spec.notification_id) {
            warn!(
                "Could not dismiss display for process {}: {}",
                self.external_id, e
            );
        }
        self.state_tx.send_replace(ProcessState::Terminated);
    }
}

/// Handle to a started notifier process.
///
/// Dropping the handle detaches the countdown thread; the process still runs
/// to completion and terminates itself.
pub struct NotifierHandle {
    state: watch::Receiver<ProcessState>,
    thread: Option<thread::JoinHandle<()>>,
}

impl NotifierHandle {
    /// The process's lifecycle state, observable from any task.
    pub fn state(&self) -> watch::Receiver<ProcessState> {
        self.state.clone()
    }

    /// Snapshot of the current state.
    pub fn current_state(&self) -> ProcessState {
        self.state.borrow().clone()
    }

    /// Whether the process has terminated.
    pub fn is_finished(&self) -> bool {
        self.state.borrow().is_terminal()
    }

    /// Waits until the process reaches `Terminated`.
    pub async fn terminated(&mut self) {
        let _ = self
            .state
            .wait_for(|state| state.is_terminal())
            .await;
    }

    /// Joins the countdown thread. Blocking; intended for shutdown paths.
    pub fn join(mut self) -> thread::Result<()> {
        match self.thread.take() {
            Some(thread) => thread.join(),
            None => Ok(()),
        }
    }
}
