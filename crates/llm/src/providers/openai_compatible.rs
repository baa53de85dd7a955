//! OpenAI-compatible chat completions over HTTP (OpenRouter by default)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument};

use super::CompletionProvider;
use crate::{CompletionRequest, LlmError, LlmResult};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Clone)]
pub struct OpenAiCompatibleProvider {
    api_key: String,
    endpoint: String,
    client: Client,
    timeout: Duration,
}

impl OpenAiCompatibleProvider {
    pub fn new(api_key: String, endpoint: Option<String>) -> LlmResult<Self> {
        if api_key.trim().is_empty() {
            return Err(LlmError::Configuration("API key cannot be empty".to_string()));
        }

        let timeout = Duration::from_secs(30);
        Ok(Self {
            api_key,
            endpoint: endpoint
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            client: build_client(timeout)?,
            timeout,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> LlmResult<Self> {
        self.client = build_client(timeout)?;
        self.timeout = timeout;
        Ok(self)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn build_client(timeout: Duration) -> LlmResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {e}")))
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    #[instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    async fn complete(&self, request: &CompletionRequest, model: &str) -> LlmResult<String> {
        let start_time = Instant::now();

        let mut messages = Vec::with_capacity(2);
        if let Some(system_prompt) = &request.system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user_prompt,
        });

        let body = ChatCompletionRequest {
            model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(
            "Sending completion request: {} (model: {})",
            request.user_prompt.chars().take(50).collect::<String>(),
            model
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::transport(model, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::transport(model, e))?;

        if !status.is_success() {
            error!("Completion API error from {}: {} {}", model, status, text);
            return Err(LlmError::Status {
                model: model.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        let content = decode_completion(model, &text)?;
        info!(
            "Received completion from {} in {:?} ({} chars)",
            model,
            start_time.elapsed(),
            content.len()
        );
        Ok(content)
    }
}

/// Decode a chat completion body into the first choice's text
pub fn decode_completion(model: &str, body: &str) -> LlmResult<String> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::MalformedResponse {
            model: model.to_string(),
            reason: e.to_string(),
        })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| LlmError::EmptyResponse {
            model: model.to_string(),
        })
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Typed chat completion response; unknown fields are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}
