use anyhow::{Context, Result};
use domain::config::{ListAiConfig, Profile, WriteFailurePolicy};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, info, warn};

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Default,
}

pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_paths: Self::default_config_paths(),
            env_prefix: "LISTAI_".to_string(),
        }
    }

    /// Check `path` before the standard locations
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.config_paths.insert(0, path);
        self
    }

    /// Only look at the given paths
    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config_paths = paths;
        self
    }

    pub fn with_env_prefix(mut self, prefix: String) -> Self {
        self.env_prefix = prefix;
        self
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".listairc"),
            PathBuf::from(".listairc.toml"),
            PathBuf::from(".listairc.json"),
            PathBuf::from("listai.toml"),
            PathBuf::from("listai.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".config").join("listai").join("config.toml"));
            paths.push(home_dir.join(".config").join("listai").join("config.json"));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("listai").join("config.toml"));
        }

        paths
    }

    pub async fn load(&self) -> Result<ListAiConfig> {
        Ok(self.load_with_source().await?.0)
    }

    /// Defaults, then the first config file found, then the active
    /// profile's defaults, then environment overrides
    pub async fn load_with_source(&self) -> Result<(ListAiConfig, ConfigSource)> {
        let (mut config, source) = self.load_base_config().await;

        if let Some(profile) = self.detect_profile() {
            debug!("Profile from environment: {}", profile.name());
            config.profile = profile;
        }
        config.apply_profile_defaults();

        let config = self.apply_env_overrides(config)?;
        debug!(
            "Configuration ready: profile={}, models={}",
            config.profile.name(),
            config.assistant.models.len()
        );
        Ok((config, source))
    }

    /// Profile named by `<prefix>ENV`, if set
    pub fn detect_profile(&self) -> Option<Profile> {
        self.env_var("ENV")
            .and_then(|value| Profile::from_str(&value).ok())
    }

    async fn load_base_config(&self) -> (ListAiConfig, ConfigSource) {
        for path in &self.config_paths {
            if !path.exists() {
                continue;
            }
            match self.load_file(path).await {
                Ok(config) => {
                    info!("Loaded configuration from: {}", path.display());
                    return (config, ConfigSource::File(path.clone()));
                }
                Err(e) => {
                    warn!("Failed to load config from {}: {:#}", path.display(), e);
                }
            }
        }
        (ListAiConfig::default(), ConfigSource::Default)
    }

    async fn load_file(&self, path: &Path) -> Result<ListAiConfig> {
        let content = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&content).context("Failed to parse TOML config"),
            "json" => serde_json::from_str(&content).context("Failed to parse JSON config"),
            _ => toml::from_str(&content)
                .or_else(|_| serde_json::from_str(&content))
                .context("Failed to parse config file"),
        }
    }

    fn env_var(&self, name: &str) -> Option<String> {
        env::var(format!("{}{}", self.env_prefix, name))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    fn apply_env_overrides(&self, mut config: ListAiConfig) -> Result<ListAiConfig> {
        if let Some(level) = self.env_var("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(json) = self.env_var("LOG_JSON") {
            config.logging.json_output = parse_flag(&json);
        }

        if let Some(models) = self.env_var("MODELS") {
            config.assistant.models = models
                .split(',')
                .map(str::trim)
                .filter(|model| !model.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(base_url) = self.env_var("LLM_BASE_URL") {
            config.assistant.base_url = base_url;
        }

        if let Some(temperature) = self.env_var("TEMPERATURE") {
            config.assistant.temperature = temperature
                .parse()
                .with_context(|| format!("Invalid {}TEMPERATURE: {temperature}", self.env_prefix))?;
        }

        if let Some(policy) = self.env_var("WRITE_FAILURE_POLICY") {
            config.session.write_failure_policy = WriteFailurePolicy::from_str(&policy)
                .map_err(anyhow::Error::msg)
                .context("Invalid write failure policy")?;
        }

        Ok(config)
    }

    pub async fn save_config(&self, config: &ListAiConfig, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("toml");

        let content = match extension {
            "json" => serde_json::to_string_pretty(config)?,
            _ => toml::to_string_pretty(config)?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(path, content).await?;
        info!("Configuration saved to: {}", path.display());

        Ok(())
    }

    pub fn generate_example_config() -> String {
        toml::to_string_pretty(&ListAiConfig::default())
            .unwrap_or_else(|_| "Failed to generate example config".to_string())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
