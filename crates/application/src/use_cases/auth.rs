use domain::{AuthRepository, DomainError, Email, UserAccount, MIN_PASSWORD_LENGTH};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::ApplicationResult;

/// Use Case: account lifecycle on top of the identity service
pub struct AuthUseCase {
    repository: Arc<dyn AuthRepository>,
}

impl AuthUseCase {
    pub fn new(repository: Arc<dyn AuthRepository>) -> Self {
        Self { repository }
    }

    /// Create an account and send the verification mail.
    ///
    /// The account cannot sign in until the address is verified.
    #[instrument(skip(self, password, confirmation))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> ApplicationResult<UserAccount> {
        let email = Email::parse(email)?;
        if password != confirmation {
            return Err(DomainError::PasswordMismatch.into());
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::WeakPassword {
                min_length: MIN_PASSWORD_LENGTH,
            }
            .into());
        }

        let account = self.repository.sign_up(&email, password).await?;
        self.repository.send_verification_email().await?;
        info!("Registered account {}, verification mail sent", account.email);
        Ok(account)
    }

    /// Sign in; unverified accounts are signed out again
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> ApplicationResult<UserAccount> {
        let email = Email::parse(email)?;
        let account = self.repository.sign_in(&email, password).await?;

        if !account.email_verified {
            if let Err(e) = self.repository.sign_out().await {
                warn!("Failed to sign out unverified account: {}", e);
            }
            return Err(DomainError::EmailNotVerified(account.email.to_string()).into());
        }

        Ok(account)
    }

    pub async fn sign_out(&self) -> ApplicationResult<()> {
        Ok(self.repository.sign_out().await?)
    }

    pub fn current_user(&self) -> Option<UserAccount> {
        self.repository.current_user()
    }

    pub fn current_user_email(&self) -> Option<Email> {
        self.current_user().map(|account| account.email)
    }

    /// Signed-in account or `Unauthenticated`
    pub fn require_user(&self) -> ApplicationResult<UserAccount> {
        self.current_user()
            .ok_or_else(|| DomainError::Unauthenticated.into())
    }

    /// A session counts only when the address has been verified
    pub fn has_verified_session(&self) -> bool {
        self.current_user()
            .is_some_and(|account| account.email_verified)
    }

    pub async fn send_password_reset(&self, email: &str) -> ApplicationResult<()> {
        let email = Email::parse(email)?;
        Ok(self.repository.send_password_reset(&email).await?)
    }

    pub async fn resend_verification_email(&self) -> ApplicationResult<()> {
        self.require_user()?;
        Ok(self.repository.send_verification_email().await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_account(&self) -> ApplicationResult<()> {
        let account = self.require_user()?;
        self.repository.delete_account().await?;
        info!("Deleted account {}", account.email);
        Ok(())
    }
}
