//! Completion API client
//!
//! An OpenAI-compatible HTTP provider and the linear model fallback chain
//! that drives it.

use serde::{Deserialize, Serialize};

mod errors;
mod fallback;
pub mod providers;

pub use errors::{LlmError, LlmResult};
pub use fallback::{Completion, ModelFallbackChain};
pub use providers::openai_compatible::{decode_completion, DEFAULT_BASE_URL};
pub use providers::{ChatCompletionResponse, CompletionProvider, OpenAiCompatibleProvider};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// One prompt pair plus sampling parameters; the model is chosen by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: None,
            user_prompt: user_prompt.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}
