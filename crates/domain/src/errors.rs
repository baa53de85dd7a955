//! Domain Errors - Business rule violations and collaborator failures
//!
//! Validation errors are produced before any I/O. Collaborator failures are
//! passed through from the repositories in typed form so that callers can
//! react to them without knowing which backend produced them.

use thiserror::Error;

/// Domain-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Business validation: name empty after trimming
    #[error("Name cannot be empty")]
    EmptyName,

    /// Business rule: normalized name already present in the list
    #[error("Item '{name}' already exists in this list")]
    DuplicateItem { name: String },

    /// Business validation: malformed email address
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Business validation: password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Business validation: password too short
    #[error("Password must be at least {min_length} characters long")]
    WeakPassword { min_length: usize },

    /// Business rule: requested move is outside of the item range
    #[error("Cannot move item from position {from} to {to} in a list of {len} items")]
    InvalidMove { from: usize, to: usize, len: usize },

    /// Business rule: no order key is left after the largest stored one
    #[error("Cannot append after order key {max}")]
    OrderOverflow { max: i64 },

    /// No signed-in user
    #[error("No authenticated user")]
    Unauthenticated,

    /// Identity service rejected the email/password pair
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Signed-in user has not verified the email address yet
    #[error("Email address {0} has not been verified")]
    EmailNotVerified(String),

    /// Resource missing in the backing store
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Account already registered in the identity service
    #[error("Account already exists: {0}")]
    AccountExists(String),

    /// Every configured completion model failed
    #[error("Assistant service unavailable after trying models: {}", attempted.join(", "))]
    ServiceUnavailable { attempted: Vec<String> },

    /// Completion API answered with a payload that does not decode
    #[error("Malformed assistant response: {0}")]
    MalformedResponse(String),

    /// Opaque collaborator failure
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateItem { name: name.into() }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Check if error is a business validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyName
                | DomainError::InvalidEmail(_)
                | DomainError::PasswordMismatch
                | DomainError::WeakPassword { .. }
        )
    }

    /// Check if error is a business rule violation
    pub fn is_business_rule_error(&self) -> bool {
        matches!(
            self,
            DomainError::DuplicateItem { .. }
                | DomainError::InvalidMove { .. }
                | DomainError::OrderOverflow { .. }
                | DomainError::AccountExists(_)
        )
    }

    /// Check if error indicates missing data
    pub fn is_not_found_error(&self) -> bool {
        matches!(self, DomainError::NotFound { .. })
    }

    pub fn is_access_error(&self) -> bool {
        matches!(
            self,
            DomainError::Unauthenticated
                | DomainError::InvalidCredentials
                | DomainError::EmailNotVerified(_)
        )
    }

    /// Errors raised by a collaborator rather than by local rules
    pub fn is_external_error(&self) -> bool {
        matches!(
            self,
            DomainError::ServiceUnavailable { .. }
                | DomainError::MalformedResponse(_)
                | DomainError::Transport(_)
        )
    }

    /// Get error category for business logic
    pub fn category(&self) -> ErrorCategory {
        if self.is_validation_error() {
            ErrorCategory::Validation
        } else if self.is_business_rule_error() {
            ErrorCategory::BusinessRule
        } else if self.is_not_found_error() {
            ErrorCategory::NotFound
        } else if self.is_access_error() {
            ErrorCategory::Access
        } else {
            ErrorCategory::External
        }
    }
}

/// Categories of domain errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Input validation errors
    Validation,
    /// Business rule violations
    BusinessRule,
    /// Resource not found
    NotFound,
    /// Authentication and verification
    Access,
    /// Store, identity or completion failures
    External,
}
