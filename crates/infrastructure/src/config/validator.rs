use anyhow::{bail, Result};
use domain::config::{AssistantConfig, ListAiConfig, LoggingConfig, SessionConfig};
use tracing::warn;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, config: &ListAiConfig) -> Result<()> {
        self.validate_assistant_config(&config.assistant)?;
        self.validate_session_config(&config.session)?;
        self.validate_logging_config(&config.logging)?;
        Ok(())
    }

    fn validate_assistant_config(&self, config: &AssistantConfig) -> Result<()> {
        if !(0.0..=2.0).contains(&config.temperature) {
            bail!(
                "Temperature must be between 0.0 and 2.0, got {}",
                config.temperature
            );
        }

        if config.models.iter().all(|model| model.trim().is_empty()) {
            bail!("At least one assistant model must be configured");
        }

        if !(config.base_url.starts_with("https://") || config.base_url.starts_with("http://")) {
            bail!("Assistant base URL must be http(s), got '{}'", config.base_url);
        }
        if config.base_url.starts_with("http://") {
            warn!("Assistant base URL is not using TLS: {}", config.base_url);
        }

        if config.api_key_env.trim().is_empty() {
            bail!("api_key_env cannot be empty");
        }

        if config.max_tokens == Some(0) {
            bail!("max_tokens must be greater than 0");
        }

        if config.request_timeout_secs == 0 {
            bail!("Request timeout must be greater than 0");
        }

        Ok(())
    }

    fn validate_session_config(&self, config: &SessionConfig) -> Result<()> {
        if config.assistant_timeout_secs == 0 {
            bail!("Assistant timeout must be greater than 0");
        }

        if config.suggestion_history_limit == 0 {
            warn!("Suggestion history is disabled, the assistant may repeat itself");
        }

        Ok(())
    }

    fn validate_logging_config(&self, config: &LoggingConfig) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&config.level.to_lowercase().as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: {:?}",
                config.level,
                valid_levels
            );
        }
        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
