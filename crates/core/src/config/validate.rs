use super::{types::Config, ConfigError};

/// Validate a loaded configuration beyond what deserialization enforces.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.api.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "api.base_url must be set".to_string(),
        ));
    }

    if !config.api.base_url.starts_with("http://") && !config.api.base_url.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "api.base_url must be an http(s) URL, got '{}'",
            config.api.base_url
        )));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "api.timeout_secs must be greater than zero".to_string(),
        ));
    }

    if config.poller.interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "poller.interval_ms must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
