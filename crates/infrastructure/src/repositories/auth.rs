use async_trait::async_trait;
use domain::{AuthRepository, DomainError, DomainResult, Email, UserAccount, UserId};
use std::sync::Arc;
use tracing::warn;

use super::errors::map_identity_error;
use crate::identity::{IdentityProvider, IdentityUser};

pub struct IdentityAuthRepository {
    identity: Arc<dyn IdentityProvider>,
}

impl IdentityAuthRepository {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }
}

fn to_account(user: IdentityUser) -> DomainResult<UserAccount> {
    let email = Email::parse(&user.email)?;
    Ok(UserAccount::new(UserId::from(user.uid), email, user.email_verified))
}

#[async_trait]
impl AuthRepository for IdentityAuthRepository {
    async fn sign_in(&self, email: &Email, password: &str) -> DomainResult<UserAccount> {
        let user = self
            .identity
            .sign_in(email.as_str(), password)
            .await
            .map_err(map_identity_error)?;
        to_account(user)
    }

    async fn sign_up(&self, email: &Email, password: &str) -> DomainResult<UserAccount> {
        let user = self
            .identity
            .sign_up(email.as_str(), password)
            .await
            .map_err(map_identity_error)?;
        to_account(user)
    }

    async fn sign_out(&self) -> DomainResult<()> {
        self.identity.sign_out().await.map_err(map_identity_error)
    }

    fn current_user(&self) -> Option<UserAccount> {
        let user = self.identity.current_user()?;
        match to_account(user) {
            Ok(account) => Some(account),
            Err(e) => {
                warn!("Identity service returned an unusable account: {}", e);
                None
            }
        }
    }

    async fn send_password_reset(&self, email: &Email) -> DomainResult<()> {
        self.identity
            .send_password_reset(email.as_str())
            .await
            .map_err(map_identity_error)
    }

    async fn send_verification_email(&self) -> DomainResult<()> {
        self.identity
            .send_verification_email()
            .await
            .map_err(map_identity_error)
    }

    async fn delete_account(&self) -> DomainResult<()> {
        if self.identity.current_user().is_none() {
            return Err(DomainError::Unauthenticated);
        }
        self.identity
            .delete_current_user()
            .await
            .map_err(map_identity_error)
    }
}
