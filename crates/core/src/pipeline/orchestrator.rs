//! Pipeline orchestrator.
//!
//! Builds three-stage chains, drives them strictly sequentially, and spawns a
//! notifier process when stage 2 and stage 3 reach terminal success. Stage
//! ordering is enforced here directly: one driver task per chain awaits each
//! stage's terminal status before the next stage starts, so at most one stage
//! of a chain is ever running.
//!
//! Failure policy: a failed stage does not abort the chain. Later stages
//! still run once their predecessor is terminal; only terminal successes are
//! surfaced and only they spawn notifier processes.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::metrics;
use crate::notifier::{
    ChannelRegistry, CompletionHub, NotifierHandle, NotifierProcess, NotifierSpec, StatusDisplay,
};
use crate::presenter::Presenter;
use crate::work::{StageOutcome, WorkItemExecutor};

use super::chain::PipelineChain;
use super::types::{
    ChainReport, NotifierReport, OrchestratorConfig, PipelineError, StageReport, StageStatus,
};

struct ChainEntry {
    correlation_id: String,
    stages: Vec<StageReport>,
}

struct NotifierEntry {
    channel_id: String,
    handle: NotifierHandle,
}

/// The pipeline orchestrator.
///
/// Cheaply cloneable; clones share all state.
#[derive(Clone)]
pub struct PipelineOrchestrator {
    config: OrchestratorConfig,
    executor: Arc<WorkItemExecutor>,
    presenter: Arc<dyn Presenter>,
    display: Arc<dyn StatusDisplay>,
    registry: Arc<ChannelRegistry>,
    completions: Arc<CompletionHub>,
    chains: Arc<RwLock<HashMap<String, ChainEntry>>>,
    notifiers: Arc<RwLock<HashMap<String, NotifierEntry>>>,
}

impl PipelineOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        executor: Arc<WorkItemExecutor>,
        presenter: Arc<dyn Presenter>,
        display: Arc<dyn StatusDisplay>,
    ) -> Self {
        let registry = Arc::new(ChannelRegistry::new(Arc::clone(&display)));

        Self {
            config,
            executor,
            presenter,
            display,
            registry,
            completions: Arc::new(CompletionHub::new()),
            chains: Arc::new(RwLock::new(HashMap::new())),
            notifiers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The hub holding per-process completion channels.
    pub fn completion_hub(&self) -> Arc<CompletionHub> {
        Arc::clone(&self.completions)
    }

    /// Builds a three-stage chain correlated by `correlation_id`.
    pub fn build_chain(&self, correlation_id: &str) -> Result<PipelineChain, PipelineError> {
        PipelineChain::build(correlation_id)
    }

    /// Submits a chain for execution.
    ///
    /// Returns immediately; the chain is driven by a background task. A chain
    /// id can only be submitted once.
    pub async fn submit(&self, chain: PipelineChain) -> Result<(), PipelineError> {
        {
            let mut chains = self.chains.write().await;
            if chains.contains_key(&chain.chain_id) {
                return Err(PipelineError::ChainExists(chain.chain_id.clone()));
            }

            let stages = chain
                .items
                .iter()
                .enumerate()
                .map(|(idx, item)| StageReport {
                    index: idx + 1,
                    item_id: item.id.clone(),
                    status: StageStatus::Pending,
                    started_at: None,
                    finished_at: None,
                })
                .collect();

            chains.insert(
                chain.chain_id.clone(),
                ChainEntry {
                    correlation_id: chain.correlation_id.clone(),
                    stages,
                },
            );
        }

        metrics::CHAINS_SUBMITTED.inc();
        info!(
            "Submitted chain {} (correlation id {})",
            chain.chain_id, chain.correlation_id
        );

        let orchestrator = self.clone();
        tokio::spawn(async move { orchestrator.drive_chain(chain).await });

        Ok(())
    }

    /// Registers interest in a notifier process's completion channel.
    ///
    /// Each registration receives the channel's retained value exactly once
    /// (late registrations included) and surfaces it through the presenter.
    /// Safe to call repeatedly across the orchestrator's lifetime.
    pub async fn observe_completion(&self, process_id: &str) {
        let mut subscription = self.completions.subscribe(process_id).await;
        let presenter = Arc::clone(&self.presenter);
        let process_id = process_id.to_string();

        tokio::spawn(async move {
            match subscription.recv().await {
                Some(event) => {
                    presenter.surface(&format!(
                        "Process for channel {} is done ({})",
                        event.value, event.process_id
                    ));
                }
                None => {
                    debug!(
                        "Completion channel for {} closed without an event",
                        process_id
                    );
                }
            }
        });
    }

    /// Report for one chain, if known.
    pub async fn chain_report(&self, chain_id: &str) -> Option<ChainReport> {
        let chains = self.chains.read().await;
        chains.get(chain_id).map(|entry| ChainReport {
            chain_id: chain_id.to_string(),
            correlation_id: entry.correlation_id.clone(),
            stages: entry.stages.clone(),
        })
    }

    /// Reports for all known chains, ordered by chain id.
    pub async fn list_chains(&self) -> Vec<ChainReport> {
        let chains = self.chains.read().await;
        let mut reports: Vec<ChainReport> = chains
            .iter()
            .map(|(chain_id, entry)| ChainReport {
                chain_id: chain_id.clone(),
                correlation_id: entry.correlation_id.clone(),
                stages: entry.stages.clone(),
            })
            .collect();
        reports.sort_by(|a, b| a.chain_id.cmp(&b.chain_id));
        reports
    }

    /// Reports for all spawned notifier processes, ordered by process id.
    pub async fn notifier_reports(&self) -> Vec<NotifierReport> {
        let notifiers = self.notifiers.read().await;
        let mut reports: Vec<NotifierReport> = notifiers
            .iter()
            .map(|(process_id, entry)| NotifierReport {
                process_id: process_id.clone(),
                channel_id: entry.channel_id.clone(),
                state: entry.handle.current_state(),
            })
            .collect();
        reports.sort_by(|a, b| a.process_id.cmp(&b.process_id));
        reports
    }

    /// Drives a chain to completion, one stage at a time.
    async fn drive_chain(&self, chain: PipelineChain) {
        for (idx, item) in chain.items.iter().enumerate() {
            let stage_no = idx + 1;

            self.executor.wait_for_constraints(item).await;
            self.record_stage(&chain.chain_id, idx, |stage| {
                stage.status = StageStatus::Running;
                stage.started_at = Some(Utc::now());
            })
            .await;

            let outcome = self.executor.execute(item).await;
            self.record_stage(&chain.chain_id, idx, |stage| {
                stage.status = outcome.status.into();
                stage.started_at = Some(outcome.started_at);
                stage.finished_at = Some(outcome.finished_at);
            })
            .await;

            debug!(
                "Stage {} of chain {} terminal: {:?}",
                stage_no, chain.chain_id, outcome.status
            );
            self.on_stage_terminal(&chain, stage_no, &outcome).await;
        }

        info!("Chain {} finished all stages", chain.chain_id);
    }

    /// Handles one stage reaching a terminal status.
    async fn on_stage_terminal(
        &self,
        chain: &PipelineChain,
        stage_no: usize,
        outcome: &StageOutcome,
    ) {
        if !outcome.status.is_success() {
            warn!(
                "Stage {} of chain {} failed; remaining stages still run",
                stage_no, chain.chain_id
            );
            return;
        }

        self.presenter
            .surface(&format!("{} process is done", ordinal(stage_no)));

        match stage_no {
            2 => self.spawn_notifier(self.config.first_notifier.clone()).await,
            3 => self.spawn_notifier(self.config.second_notifier.clone()).await,
            _ => {}
        }
    }

    /// Creates, observes, and starts one notifier process.
    ///
    /// Notifier errors are local: they are logged and never propagate to the
    /// chain or to the other process.
    async fn spawn_notifier(&self, spec: NotifierSpec) {
        let external_id = spec.channel_id.clone();
        let channel = self.completions.channel(&external_id).await;

        let process = match NotifierProcess::new(
            spec.clone(),
            &external_id,
            Arc::clone(&self.display),
            Arc::clone(&self.registry),
            channel,
        ) {
            Ok(process) => process,
            Err(e) => {
                warn!(
                    "Could not create notifier process for channel {}: {}",
                    spec.channel_id, e
                );
                return;
            }
        };

        self.observe_completion(&external_id).await;

        match process.start() {
            Ok(handle) => {
                let mut notifiers = self.notifiers.write().await;
                notifiers.insert(
                    external_id,
                    NotifierEntry {
                        channel_id: spec.channel_id,
                        handle,
                    },
                );
            }
            Err(e) => {
                warn!("Could not start notifier process {}: {}", external_id, e);
            }
        }
    }

    async fn record_stage(
        &self,
        chain_id: &str,
        idx: usize,
        update: impl FnOnce(&mut StageReport),
    ) {
        let mut chains = self.chains.write().await;
        if let Some(entry) = chains.get_mut(chain_id) {
            if let Some(stage) = entry.stages.get_mut(idx) {
                update(stage);
            }
        }
    }
}

fn ordinal(stage_no: usize) -> &'static str {
    match stage_no {
        1 => "First",
        2 => "Second",
        3 => "Third",
        _ => "Next",
    }
}
