//! AssistantRepository - Domain abstraction over the completion API
//!
//! Implementations render prompts, call the completion service and return
//! cleaned suggestions. Filtering against existing items is not their job.

use async_trait::async_trait;

use crate::entities::{AnalysisRequest, AnalysisResult, SuggestionBatch, SuggestionRequest};
use crate::errors::DomainResult;

#[async_trait]
pub trait AssistantRepository: Send + Sync {
    /// Cleaned, batch-unique candidate names for one subject
    async fn suggest_items(&self, request: &SuggestionRequest) -> DomainResult<SuggestionBatch>;

    /// Missing items and short tips for a whole list
    async fn analyze_list(&self, request: &AnalysisRequest) -> DomainResult<AnalysisResult>;
}
