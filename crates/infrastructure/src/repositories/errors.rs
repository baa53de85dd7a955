//! Adapter error translation into the domain taxonomy

use domain::DomainError;
use llm::LlmError;

use crate::identity::IdentityError;
use crate::store::StoreError;

pub fn map_store_error(error: StoreError) -> DomainError {
    match error {
        StoreError::NotFound(path) => DomainError::not_found("document", path),
        StoreError::PermissionDenied(_) => DomainError::Unauthenticated,
        other => DomainError::transport(other.to_string()),
    }
}

pub fn map_identity_error(error: IdentityError) -> DomainError {
    match error {
        IdentityError::NotSignedIn => DomainError::Unauthenticated,
        IdentityError::InvalidCredentials => DomainError::InvalidCredentials,
        IdentityError::UserNotFound(email) => DomainError::not_found("account", email),
        IdentityError::EmailAlreadyInUse(email) => DomainError::AccountExists(email),
        IdentityError::WeakPassword { min_length } => DomainError::WeakPassword { min_length },
        other => DomainError::transport(other.to_string()),
    }
}

pub fn map_llm_error(error: LlmError) -> DomainError {
    match error {
        LlmError::ServiceUnavailable { attempted, .. } => {
            DomainError::ServiceUnavailable { attempted }
        }
        LlmError::MalformedResponse { .. } | LlmError::EmptyResponse { .. } => {
            DomainError::MalformedResponse(error.to_string())
        }
        other => DomainError::transport(other.to_string()),
    }
}
