use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Configuration profile for different environments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Development profile with verbose, human-readable logging
    #[default]
    Dev,
    /// Production profile with JSON logging
    Prod,
    /// Custom profile with user-defined name
    Custom(String),
}

impl Profile {
    /// Get the profile name as a string
    pub fn name(&self) -> &str {
        match self {
            Profile::Dev => "dev",
            Profile::Prod => "prod",
            Profile::Custom(name) => name,
        }
    }
}

impl FromStr for Profile {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "dev" | "development" => Profile::Dev,
            "prod" | "production" => Profile::Prod,
            custom => Profile::Custom(custom.to_string()),
        })
    }
}

/// What to do with an optimistic local change when the store write fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WriteFailurePolicy {
    /// Keep the local change and surface the error
    #[default]
    KeepLocal,
    /// Restore the previous local value and surface the error
    Revert,
}

impl FromStr for WriteFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "keep_local" | "keep" => Ok(WriteFailurePolicy::KeepLocal),
            "revert" | "rollback" => Ok(WriteFailurePolicy::Revert),
            other => Err(format!("unknown write failure policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListAiConfig {
    #[serde(default)]
    pub profile: Profile,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ListAiConfig {
    /// Profile-driven defaults that a config file did not set explicitly
    pub fn apply_profile_defaults(&mut self) {
        if self.profile == Profile::Prod {
            self.logging.json_output = true;
        }
    }
}

/// Completion API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Base URL of an OpenAI-compatible API; `/chat/completions` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable holding the bearer token
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model identifiers in priority order
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default)]
    pub max_tokens: Option<u32>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            models: default_models(),
            temperature: default_temperature(),
            max_tokens: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AssistantConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// List session behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub write_failure_policy: WriteFailurePolicy,

    /// Caller-level timeout around assistant calls
    #[serde(default = "default_assistant_timeout_secs")]
    pub assistant_timeout_secs: u64,

    /// Recently suggested names remembered per list
    #[serde(default = "default_history_limit")]
    pub suggestion_history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            write_failure_policy: WriteFailurePolicy::default(),
            assistant_timeout_secs: default_assistant_timeout_secs(),
            suggestion_history_limit: default_history_limit(),
        }
    }
}

impl SessionConfig {
    pub fn assistant_timeout(&self) -> Duration {
        Duration::from_secs(self.assistant_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_output: false,
        }
    }
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}

fn default_models() -> Vec<String> {
    vec![
        "mistralai/mistral-7b-instruct".to_string(),
        "meta-llama/llama-3.1-8b-instruct".to_string(),
        "google/gemma-2-9b-it".to_string(),
    ]
}

fn default_temperature() -> f32 {
    0.7
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_assistant_timeout_secs() -> u64 {
    15
}

fn default_history_limit() -> usize {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}
