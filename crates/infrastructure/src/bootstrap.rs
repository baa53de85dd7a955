//! Process-level wiring: config, logging and the repository set

use anyhow::{Context, Result};
use common::LoggingConfig;
use domain::config::{AssistantConfig, ListAiConfig};
use domain::{AssistantRepository, AuthRepository, ItemRepository, ListRepository};
use llm::{CompletionProvider, LlmError, ModelFallbackChain, OpenAiCompatibleProvider};
use std::env;
use std::sync::Arc;
use tracing::info;

use crate::config::{ConfigLoader, ConfigValidator};
use crate::identity::{IdentityProvider, InMemoryIdentityProvider};
use crate::repositories::{
    CompletionAssistantRepository, IdentityAuthRepository, StoreItemRepository,
    StoreListRepository,
};
use crate::store::{DocumentStore, InMemoryDocumentStore};

/// Load and validate the configuration from the standard locations
pub async fn load_config() -> Result<ListAiConfig> {
    let config = ConfigLoader::new().load().await?;
    ConfigValidator::new()
        .validate(&config)
        .context("Invalid configuration")?;
    Ok(config)
}

pub fn init_logging(config: &ListAiConfig) -> Result<()> {
    common::init_structured_logging(LoggingConfig::from_settings(
        &config.logging.level,
        config.logging.json_output,
    ))
}

/// HTTP completion provider from the assistant settings.
///
/// The API key is read from `config.api_key_env`, after loading `.env`.
pub fn completion_provider(config: &AssistantConfig) -> Result<Arc<dyn CompletionProvider>> {
    dotenv::dotenv().ok();

    let api_key = env::var(&config.api_key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| LlmError::MissingApiKey(config.api_key_env.clone()))?;

    let provider = OpenAiCompatibleProvider::new(api_key, Some(config.base_url.clone()))?
        .with_timeout(config.request_timeout())?;
    info!("Completion endpoint: {}", provider.endpoint());
    Ok(Arc::new(provider))
}

/// The four repositories the application layer needs
#[derive(Clone)]
pub struct Repositories {
    pub lists: Arc<dyn ListRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub auth: Arc<dyn AuthRepository>,
    pub assistant: Arc<dyn AssistantRepository>,
}

/// In-memory backend plus handles for local flows and tests
pub struct InMemoryBackend {
    pub repositories: Repositories,
    pub store: InMemoryDocumentStore,
    pub identity: Arc<InMemoryIdentityProvider>,
}

impl Repositories {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        completion: Arc<dyn CompletionProvider>,
        config: &AssistantConfig,
    ) -> Result<Self> {
        let chain = ModelFallbackChain::new(completion, config.models.clone())?;

        Ok(Self {
            lists: Arc::new(StoreListRepository::new(store.clone())),
            items: Arc::new(StoreItemRepository::new(store)),
            auth: Arc::new(IdentityAuthRepository::new(identity)),
            assistant: Arc::new(CompletionAssistantRepository::new(chain, config)),
        })
    }

    pub fn in_memory(
        completion: Arc<dyn CompletionProvider>,
        config: &AssistantConfig,
    ) -> Result<InMemoryBackend> {
        let store = InMemoryDocumentStore::new();
        let identity = Arc::new(InMemoryIdentityProvider::new());
        let repositories = Self::new(
            Arc::new(store.clone()),
            identity.clone(),
            completion,
            config,
        )?;

        Ok(InMemoryBackend {
            repositories,
            store,
            identity,
        })
    }
}
