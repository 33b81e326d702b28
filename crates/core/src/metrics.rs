//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Pipeline chains (submissions, stage outcomes, stage durations)
//! - Notifier processes (ticks, completions)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

/// Chains submitted to the orchestrator.
pub static CHAINS_SUBMITTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("bellhop_chains_submitted_total", "Total chains submitted").unwrap()
});

/// Stage outcomes by terminal status.
pub static STAGES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("bellhop_stages_total", "Total stage executions"),
        &["status"], // "succeeded", "failed"
    )
    .unwrap()
});

/// Stage body duration in seconds (constraint wait excluded).
pub static STAGE_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "bellhop_stage_duration_seconds",
            "Duration of stage body execution",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
    )
    .unwrap()
});

/// Countdown ticks performed across all notifier processes.
pub static NOTIFIER_TICKS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "bellhop_notifier_ticks_total",
        "Total notifier countdown ticks",
    )
    .unwrap()
});

/// Completion events published, by display channel.
pub static NOTIFIER_COMPLETIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bellhop_notifier_completions_total",
            "Total notifier completion events published",
        ),
        &["channel"],
    )
    .unwrap()
});

/// Registers all core metrics with the given registry.
pub fn register_all(registry: &Registry) {
    let _ = registry.register(Box::new(CHAINS_SUBMITTED.clone()));
    let _ = registry.register(Box::new(STAGES_TOTAL.clone()));
    let _ = registry.register(Box::new(STAGE_DURATION.clone()));
    let _ = registry.register(Box::new(NOTIFIER_TICKS.clone()));
    let _ = registry.register(Box::new(NOTIFIER_COMPLETIONS.clone()));
}
