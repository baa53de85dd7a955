use async_trait::async_trait;
use domain::config::AssistantConfig;
use domain::services::clean_suggestion_text;
use domain::{
    AnalysisRequest, AnalysisResult, AssistantRepository, DomainResult, SuggestionBatch,
    SuggestionRequest,
};
use llm::{CompletionRequest, ModelFallbackChain};
use tracing::{debug, instrument};

use super::errors::map_llm_error;
use crate::assistant::{analysis_prompt, parse_analysis, suggestion_prompt, PromptPair};

/// Assistant backed by a completion API through the model fallback chain
pub struct CompletionAssistantRepository {
    chain: ModelFallbackChain,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl CompletionAssistantRepository {
    pub fn new(chain: ModelFallbackChain, config: &AssistantConfig) -> Self {
        Self {
            chain,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    async fn complete(&self, prompt: PromptPair) -> DomainResult<String> {
        let request = CompletionRequest::new(prompt.user)
            .with_system_prompt(prompt.system)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let completion = self.chain.complete(&request).await.map_err(map_llm_error)?;
        debug!(
            "Model {} answered with {} characters",
            completion.model,
            completion.content.len()
        );
        Ok(completion.content)
    }
}

#[async_trait]
impl AssistantRepository for CompletionAssistantRepository {
    #[instrument(skip(self, request), fields(context = %request.context))]
    async fn suggest_items(&self, request: &SuggestionRequest) -> DomainResult<SuggestionBatch> {
        let content = self.complete(suggestion_prompt(request)).await?;
        let names = clean_suggestion_text(&content);
        Ok(SuggestionBatch::new(Some(request.subject.trim().to_string()), names))
    }

    #[instrument(skip(self, request), fields(context = %request.context))]
    async fn analyze_list(&self, request: &AnalysisRequest) -> DomainResult<AnalysisResult> {
        let content = self.complete(analysis_prompt(request)).await?;
        parse_analysis(&content)
    }
}
