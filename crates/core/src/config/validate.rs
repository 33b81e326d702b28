use super::types::{Config, NotifierConfig};
use super::ConfigError;

/// Validate a loaded configuration beyond what deserialization enforces.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.probe.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "probe.poll_interval_ms must be greater than zero".to_string(),
        ));
    }

    validate_notifier("pipeline.first_notifier", &config.pipeline.first_notifier)?;
    validate_notifier("pipeline.second_notifier", &config.pipeline.second_notifier)?;

    let first = &config.pipeline.first_notifier;
    let second = &config.pipeline.second_notifier;
    if first.channel_id == second.channel_id {
        return Err(ConfigError::ValidationError(
            "notifier channel ids must be distinct".to_string(),
        ));
    }
    if first.notification_id == second.notification_id {
        return Err(ConfigError::ValidationError(
            "notifier notification ids must be distinct".to_string(),
        ));
    }

    Ok(())
}

fn validate_notifier(section: &str, notifier: &NotifierConfig) -> Result<(), ConfigError> {
    if notifier.channel_id.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{}.channel_id must not be empty",
            section
        )));
    }
    if notifier.tick_seconds == 0 {
        return Err(ConfigError::ValidationError(format!(
            "{}.tick_seconds must be at least 1",
            section
        )));
    }
    if !notifier.subtitle_template.contains("{remaining}") {
        return Err(ConfigError::ValidationError(format!(
            "{}.subtitle_template must contain the {{remaining}} placeholder",
            section
        )));
    }
    Ok(())
}
