use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bellhop_core::{
    load_config, validate_config, AlwaysSatisfied, Config, ConstraintProbe, HttpProbe,
    PipelineOrchestrator, TracingPresenter, WorkItemExecutor,
};

use bellhop_server::api::create_router;
use bellhop_server::display::LogDisplay;
use bellhop_server::state::AppState;
use bellhop_server::work::DelayBody;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("BELLHOP_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration; a missing file falls back to defaults
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        info!("No configuration file at {:?}, using defaults", config_path);
        Config::default()
    };

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded successfully");

    // Create the constraint probe
    let probe: Arc<dyn ConstraintProbe> = match &config.probe.url {
        Some(url) => {
            info!("Using HTTP network probe against {}", url);
            Arc::new(
                HttpProbe::new(url.clone(), config.probe.timeout())
                    .context("Failed to create network probe")?,
            )
        }
        None => {
            info!("No probe URL configured, constraints treated as satisfied");
            Arc::new(AlwaysSatisfied)
        }
    };

    // Create the work item executor
    let executor = Arc::new(WorkItemExecutor::new(
        Arc::new(DelayBody::new(config.work.stage_delay())),
        probe,
        config.probe.poll_interval(),
    ));

    // Create the pipeline orchestrator with log-backed collaborators
    let orchestrator = PipelineOrchestrator::new(
        config.pipeline.orchestrator_config(),
        executor,
        Arc::new(TracingPresenter),
        Arc::new(LogDisplay::new()),
    );

    // Submit the autostart chain, if configured
    if let Some(correlation_id) = config
        .pipeline
        .autostart_correlation_id
        .clone()
        .filter(|id| !id.is_empty())
    {
        match orchestrator.build_chain(&correlation_id) {
            Ok(chain) => {
                info!(
                    "Autostarting pipeline chain for correlation id {}",
                    correlation_id
                );
                if let Err(e) = orchestrator.submit(chain).await {
                    error!("Failed to submit autostart chain: {}", e);
                }
            }
            Err(e) => error!("Invalid autostart correlation id: {}", e),
        }
    }

    // Create app state and router
    let state = Arc::new(AppState::new(config.clone(), orchestrator));
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("bellhop v{} listening on {}", VERSION, addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Shutdown signal received");
}
