use std::net::IpAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::notifier::NotifierSpec;
use crate::pipeline::OrchestratorConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub work: WorkConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Constraint probe configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// URL probed with a HEAD request to decide network reachability.
    /// When unset, constraints are treated as always satisfied.
    #[serde(default)]
    pub url: Option<String>,

    /// How often to re-evaluate unmet constraints (milliseconds).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Probe request timeout in seconds.
    #[serde(default = "default_probe_timeout")]
    pub timeout_secs: u64,
}

impl ProbeConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            url: None,
            poll_interval_ms: default_poll_interval(),
            timeout_secs: default_probe_timeout(),
        }
    }
}

fn default_poll_interval() -> u64 {
    500
}

fn default_probe_timeout() -> u64 {
    10
}

/// Work body configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkConfig {
    /// Simulated duration of one stage's work body (milliseconds).
    #[serde(default = "default_stage_delay")]
    pub stage_delay_ms: u64,
}

impl WorkConfig {
    pub fn stage_delay(&self) -> Duration {
        Duration::from_millis(self.stage_delay_ms)
    }
}

impl Default for WorkConfig {
    fn default() -> Self {
        Self {
            stage_delay_ms: default_stage_delay(),
        }
    }
}

fn default_stage_delay() -> u64 {
    500
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Correlation id of a chain submitted automatically at startup.
    /// Set to an empty value to disable autostart.
    #[serde(default = "default_autostart")]
    pub autostart_correlation_id: Option<String>,

    /// Notifier process spawned when stage 2 succeeds.
    #[serde(default = "default_first_notifier")]
    pub first_notifier: NotifierConfig,

    /// Notifier process spawned when stage 3 succeeds.
    #[serde(default = "default_second_notifier")]
    pub second_notifier: NotifierConfig,
}

impl PipelineConfig {
    /// Converts to the orchestrator's runtime parameters.
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            first_notifier: self.first_notifier.to_spec(),
            second_notifier: self.second_notifier.to_spec(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            autostart_correlation_id: default_autostart(),
            first_notifier: default_first_notifier(),
            second_notifier: default_second_notifier(),
        }
    }
}

fn default_autostart() -> Option<String> {
    Some("001".to_string())
}

/// One notifier process parameterization
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifierConfig {
    pub channel_id: String,
    pub channel_name: String,
    pub display_title: String,
    pub initial_body: String,
    /// Countdown body template; `{remaining}` is substituted per tick.
    pub subtitle_template: String,
    pub countdown_start: u32,
    pub tick_seconds: u64,
    pub notification_id: u32,
    pub tap_target: String,
}

impl NotifierConfig {
    pub fn to_spec(&self) -> NotifierSpec {
        NotifierSpec {
            channel_id: self.channel_id.clone(),
            channel_name: self.channel_name.clone(),
            display_title: self.display_title.clone(),
            initial_body: self.initial_body.clone(),
            subtitle_template: self.subtitle_template.clone(),
            countdown_start: self.countdown_start,
            tick: Duration::from_secs(self.tick_seconds),
            notification_id: self.notification_id,
            tap_target: self.tap_target.clone(),
        }
    }
}

fn default_first_notifier() -> NotifierConfig {
    NotifierConfig {
        channel_id: "001".to_string(),
        channel_name: "001 Channel".to_string(),
        display_title: "Second worker process is done".to_string(),
        initial_body: "Check it out!".to_string(),
        subtitle_template: "{remaining} seconds until last warning".to_string(),
        countdown_start: 10,
        tick_seconds: 1,
        notification_id: 0xCA7,
        tap_target: "bellhop://home".to_string(),
    }
}

fn default_second_notifier() -> NotifierConfig {
    NotifierConfig {
        channel_id: "002".to_string(),
        channel_name: "002 Channel".to_string(),
        display_title: "Third worker process is done".to_string(),
        initial_body: "Check it out!".to_string(),
        subtitle_template: "{remaining} seconds until final warning".to_string(),
        countdown_start: 5,
        tick_seconds: 1,
        notification_id: 0xCA8,
        tap_target: "bellhop://home".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.probe.poll_interval_ms, 500);
        assert!(config.probe.url.is_none());
        assert_eq!(
            config.pipeline.autostart_correlation_id.as_deref(),
            Some("001")
        );
    }

    #[test]
    fn test_default_notifier_parameterizations() {
        let config = PipelineConfig::default();
        assert_eq!(config.first_notifier.channel_id, "001");
        assert_eq!(config.first_notifier.countdown_start, 10);
        assert_eq!(config.second_notifier.channel_id, "002");
        assert_eq!(config.second_notifier.countdown_start, 5);
    }

    #[test]
    fn test_to_spec_converts_tick() {
        let spec = default_first_notifier().to_spec();
        assert_eq!(spec.tick, Duration::from_secs(1));
        assert_eq!(spec.notification_id, 0xCA7);
    }

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            [server]
            port = 9000
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.pipeline.first_notifier.channel_id, "001");
    }

    #[test]
    fn test_deserialize_notifier_override() {
        let toml = r#"
            [pipeline.first_notifier]
            channel_id = "010"
            channel_name = "010 Channel"
            display_title = "Halfway there"
            initial_body = "Check it out!"
            subtitle_template = "{remaining} ticks left"
            countdown_start = 3
            tick_seconds = 2
            notification_id = 99
            tap_target = "bellhop://home"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.pipeline.first_notifier.channel_id, "010");
        assert_eq!(config.pipeline.first_notifier.tick_seconds, 2);
        // The untouched second notifier keeps its defaults.
        assert_eq!(config.pipeline.second_notifier.channel_id, "002");
    }
}
