pub mod config;
pub mod metrics;
pub mod notifier;
pub mod pipeline;
pub mod presenter;
pub mod testing;
pub mod work;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, NotifierConfig,
    PipelineConfig, ProbeConfig, ServerConfig, WorkConfig,
};
pub use notifier::{
    ChannelPriority, ChannelRegistry, CompletionChannel, CompletionEvent, CompletionHub,
    CompletionSubscription, DisplayContent, DisplayError, NotifierError, NotifierHandle,
    NotifierProcess, NotifierSpec, ProcessState, StatusDisplay,
};
pub use pipeline::{
    ChainReport, NotifierReport, OrchestratorConfig, PipelineChain, PipelineError,
    PipelineOrchestrator, StageReport, StageStatus, STAGE_COUNT,
};
pub use presenter::{Presenter, TracingPresenter};
pub use work::{
    AlwaysSatisfied, ConstraintProbe, ConstraintSet, HttpProbe, StageOutcome, TerminalStatus,
    WorkBody, WorkError, WorkItem, WorkItemExecutor, INPUT_KEY_CORRELATION_ID,
};
