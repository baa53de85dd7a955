use common::OperationTimer;
use domain::{
    AnalysisRequest, AnalysisResult, AssistantRepository, SuggestionBatch, SuggestionRequest,
};
use std::sync::Arc;
use std::time::Duration;

use crate::ApplicationResult;

/// Assistant calls slower than this are logged at WARN
const SLOW_ASSISTANT_CALL: Duration = Duration::from_secs(8);

/// Use Case: assistant requests, timed
pub struct AssistantUseCase {
    repository: Arc<dyn AssistantRepository>,
}

impl AssistantUseCase {
    pub fn new(repository: Arc<dyn AssistantRepository>) -> Self {
        Self { repository }
    }

    pub async fn suggest_items(
        &self,
        request: &SuggestionRequest,
    ) -> ApplicationResult<SuggestionBatch> {
        let mut timer = OperationTimer::new("assistant.suggest_items")
            .with_slow_threshold(SLOW_ASSISTANT_CALL);
        timer.add_field("context", request.context.as_str());
        timer.add_field("recent", request.recently_suggested.len());

        Ok(timer.finish_with_result(self.repository.suggest_items(request).await)?)
    }

    pub async fn analyze_list(
        &self,
        request: &AnalysisRequest,
    ) -> ApplicationResult<AnalysisResult> {
        let mut timer = OperationTimer::new("assistant.analyze_list")
            .with_slow_threshold(SLOW_ASSISTANT_CALL);
        timer.add_field("pending", request.pending.len());
        timer.add_field("done", request.done.len());

        Ok(timer.finish_with_result(self.repository.analyze_list(request).await)?)
    }
}
