//! Completion client errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    #[error("Transport error calling model {model}: {message}")]
    Transport { model: String, message: String },

    #[error("Model {model} returned HTTP {status}: {body}")]
    Status {
        model: String,
        status: u16,
        body: String,
    },

    #[error("Malformed response from model {model}: {reason}")]
    MalformedResponse { model: String, reason: String },

    #[error("Model {model} returned an empty completion")]
    EmptyResponse { model: String },

    #[error(
        "No model answered (tried {}){}",
        .attempted.join(", "),
        .last_error.as_ref().map(|e| format!("; last error: {e}")).unwrap_or_default()
    )]
    ServiceUnavailable {
        attempted: Vec<String>,
        last_error: Option<String>,
    },

    #[error("Missing API key: environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("Invalid completion configuration: {0}")]
    Configuration(String),
}

pub type LlmResult<T> = Result<T, LlmError>;

impl LlmError {
    pub fn transport(model: &str, error: impl std::fmt::Display) -> Self {
        Self::Transport {
            model: model.to_string(),
            message: error.to_string(),
        }
    }

    /// Failures of one model call; the fallback chain moves on to the next model
    pub fn is_model_failure(&self) -> bool {
        matches!(
            self,
            LlmError::Transport { .. }
                | LlmError::Status { .. }
                | LlmError::MalformedResponse { .. }
                | LlmError::EmptyResponse { .. }
        )
    }

    /// HTTP status of the failed call, when the server answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_failures_are_classified() {
        assert!(LlmError::transport("m", "connection reset").is_model_failure());
        assert!(LlmError::EmptyResponse { model: "m".into() }.is_model_failure());
        assert!(!LlmError::MissingApiKey("KEY".into()).is_model_failure());
        assert!(!LlmError::ServiceUnavailable {
            attempted: vec![],
            last_error: None
        }
        .is_model_failure());
    }

    #[test]
    fn test_service_unavailable_message() {
        let error = LlmError::ServiceUnavailable {
            attempted: vec!["a".into(), "b".into()],
            last_error: Some("HTTP 503".into()),
        };
        assert_eq!(
            error.to_string(),
            "No model answered (tried a, b); last error: HTTP 503"
        );
    }
}
