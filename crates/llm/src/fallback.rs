//! Linear model fallback
//!
//! One attempt per configured model, in priority order. No backoff, no
//! jitter, no retry budget: when every model has failed once the chain
//! reports `ServiceUnavailable`.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::{CompletionProvider, CompletionRequest, LlmError, LlmResult};

/// Completion text together with the model that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub model: String,
    pub content: String,
}

#[derive(Clone)]
pub struct ModelFallbackChain {
    provider: Arc<dyn CompletionProvider>,
    models: Vec<String>,
}

impl std::fmt::Debug for ModelFallbackChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelFallbackChain")
            .field("provider", &self.provider.name())
            .field("models", &self.models)
            .finish()
    }
}

impl ModelFallbackChain {
    pub fn new(provider: Arc<dyn CompletionProvider>, models: Vec<String>) -> LlmResult<Self> {
        let models: Vec<String> = models
            .into_iter()
            .map(|model| model.trim().to_string())
            .filter(|model| !model.is_empty())
            .collect();

        if models.is_empty() {
            return Err(LlmError::Configuration(
                "at least one model identifier is required".to_string(),
            ));
        }

        Ok(Self { provider, models })
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    #[instrument(skip(self, request), fields(provider = self.provider.name()))]
    pub async fn complete(&self, request: &CompletionRequest) -> LlmResult<Completion> {
        let mut attempted = Vec::with_capacity(self.models.len());
        let mut last_error = None;

        for model in &self.models {
            attempted.push(model.clone());

            match self.provider.complete(request, model).await {
                Ok(content) => {
                    if attempted.len() > 1 {
                        info!(
                            "Model {} answered after {} failed attempt(s)",
                            model,
                            attempted.len() - 1
                        );
                    }
                    return Ok(Completion {
                        model: model.clone(),
                        content,
                    });
                }
                Err(e) if e.is_model_failure() => {
                    warn!("Model {} failed, falling back: {}", model, e);
                    last_error = Some(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        warn!("All {} models failed", attempted.len());
        Err(LlmError::ServiceUnavailable {
            attempted,
            last_error,
        })
    }
}
