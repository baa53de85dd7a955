//! Identity service abstraction
//!
//! Email/password accounts with email verification. One signed-in account
//! at a time per provider instance.

pub mod memory;

pub use memory::{EmailKind, InMemoryIdentityProvider, SentEmail};

use async_trait::async_trait;
use thiserror::Error;

/// Account as reported by the identity service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    pub uid: String,
    pub email: String,
    pub email_verified: bool,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IdentityError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("No account for {0}")]
    UserNotFound(String),

    #[error("Email already in use: {0}")]
    EmailAlreadyInUse(String),

    #[error("Password must be at least {min_length} characters long")]
    WeakPassword { min_length: usize },

    #[error("No user is signed in")]
    NotSignedIn,

    #[error("Identity service unavailable: {0}")]
    Unavailable(String),
}

pub type IdentityResult<T> = Result<T, IdentityError>;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<IdentityUser>;

    /// Create an account and sign it in
    async fn sign_up(&self, email: &str, password: &str) -> IdentityResult<IdentityUser>;

    async fn sign_out(&self) -> IdentityResult<()>;

    fn current_user(&self) -> Option<IdentityUser>;

    async fn send_password_reset(&self, email: &str) -> IdentityResult<()>;

    /// Mail a verification link to the signed-in account
    async fn send_verification_email(&self) -> IdentityResult<()>;

    /// Remove the signed-in account and sign out
    async fn delete_current_user(&self) -> IdentityResult<()>;
}
