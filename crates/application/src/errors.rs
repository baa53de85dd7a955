//! Application Layer Errors
//!
//! Wraps the domain taxonomy and adds the failures that only exist at the
//! session level (no active list, caller-level timeouts).

use domain::errors::{DomainError, ErrorCategory};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApplicationError {
    /// Domain and collaborator errors, passed through unwrapped
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A list command was issued with no list selected
    #[error("No list is active")]
    NoActiveList,

    /// Caller-level timeout around an assistant call
    #[error("Operation timed out: {operation}")]
    Timeout { operation: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;

impl ApplicationError {
    pub fn timeout<S: Into<String>>(operation: S) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl Into<String>) -> Self {
        Self::Domain(DomainError::not_found(resource, id))
    }

    pub fn domain_error(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }

    /// Validation failures raised before any I/O, shown inline by the UI
    pub fn is_validation(&self) -> bool {
        self.domain_error().is_some_and(|e| {
            matches!(
                e.category(),
                ErrorCategory::Validation | ErrorCategory::BusinessRule
            )
        })
    }

    /// The user may simply try the same action again
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_external_error(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Get error category for logs
    pub fn category(&self) -> &'static str {
        match self {
            Self::Domain(e) => match e.category() {
                ErrorCategory::Validation => "validation",
                ErrorCategory::BusinessRule => "business_rule",
                ErrorCategory::NotFound => "not_found",
                ErrorCategory::Access => "access",
                ErrorCategory::External => "external",
            },
            Self::NoActiveList => "no_active_list",
            Self::Timeout { .. } => "timeout",
            Self::Configuration { .. } => "configuration",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let error: ApplicationError = DomainError::EmptyName.into();
        assert!(error.is_validation());
        assert_eq!(error.category(), "validation");

        let error: ApplicationError = DomainError::duplicate("Pan").into();
        assert!(error.is_validation());
        assert!(!error.is_retryable());

        let error: ApplicationError = DomainError::transport("offline").into();
        assert!(error.is_retryable());
        assert_eq!(error.category(), "external");

        assert!(ApplicationError::timeout("suggest").is_retryable());
        assert_eq!(ApplicationError::NoActiveList.category(), "no_active_list");
    }

    #[test]
    fn test_domain_messages_pass_through() {
        let error: ApplicationError = DomainError::Unauthenticated.into();
        assert_eq!(error.to_string(), "No authenticated user");
    }
}
