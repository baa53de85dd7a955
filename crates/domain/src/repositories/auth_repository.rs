//! AuthRepository - Domain abstraction over the identity service

use async_trait::async_trait;

use crate::entities::UserAccount;
use crate::errors::DomainResult;
use crate::value_objects::Email;

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn sign_in(&self, email: &Email, password: &str) -> DomainResult<UserAccount>;

    async fn sign_up(&self, email: &Email, password: &str) -> DomainResult<UserAccount>;

    async fn sign_out(&self) -> DomainResult<()>;

    /// Currently signed-in account, if any
    fn current_user(&self) -> Option<UserAccount>;

    async fn send_password_reset(&self, email: &Email) -> DomainResult<()>;

    /// Send the verification mail to the signed-in account
    async fn send_verification_email(&self) -> DomainResult<()>;

    /// Delete the signed-in account
    async fn delete_account(&self) -> DomainResult<()>;
}
