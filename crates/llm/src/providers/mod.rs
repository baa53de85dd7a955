use async_trait::async_trait;

use crate::{CompletionRequest, LlmResult};

pub mod openai_compatible;

pub use openai_compatible::{ChatCompletionResponse, OpenAiCompatibleProvider};

/// A completion backend able to run one request against one model.
///
/// Model selection lives outside the provider so that the fallback chain can
/// drive several models through the same connection.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Run a single completion and return the assistant text
    async fn complete(&self, request: &CompletionRequest, model: &str) -> LlmResult<String>;
}
