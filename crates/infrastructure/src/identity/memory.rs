//! In-process identity provider for local runs and tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use super::{IdentityError, IdentityProvider, IdentityResult, IdentityUser};

const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    Verification,
    PasswordReset,
}

/// Mail the provider would have sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub kind: EmailKind,
}

struct Account {
    uid: String,
    password: String,
    email_verified: bool,
}

#[derive(Default)]
struct IdentityState {
    /// Keyed by lowercased email
    accounts: HashMap<String, Account>,
    current: Option<String>,
    outbox: Vec<SentEmail>,
}

#[derive(Default)]
pub struct InMemoryIdentityProvider {
    state: Mutex<IdentityState>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an address as verified, as if the mailed link was opened
    pub fn mark_verified(&self, email: &str) -> bool {
        let mut state = self.state.lock();
        match state.accounts.get_mut(&email.trim().to_lowercase()) {
            Some(account) => {
                account.email_verified = true;
                true
            }
            None => false,
        }
    }

    pub fn outbox(&self) -> Vec<SentEmail> {
        self.state.lock().outbox.clone()
    }
}

fn user(email: &str, account: &Account) -> IdentityUser {
    IdentityUser {
        uid: account.uid.clone(),
        email: email.to_string(),
        email_verified: account.email_verified,
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<IdentityUser> {
        let key = email.trim().to_lowercase();
        let mut state = self.state.lock();
        let signed_in = match state.accounts.get(&key) {
            Some(account) if account.password == password => user(&key, account),
            Some(_) => return Err(IdentityError::InvalidCredentials),
            None => return Err(IdentityError::UserNotFound(key)),
        };
        state.current = Some(key);
        debug!("Signed in {}", signed_in.email);
        Ok(signed_in)
    }

    async fn sign_up(&self, email: &str, password: &str) -> IdentityResult<IdentityUser> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(IdentityError::WeakPassword {
                min_length: MIN_PASSWORD_LENGTH,
            });
        }

        let key = email.trim().to_lowercase();
        let mut state = self.state.lock();
        if state.accounts.contains_key(&key) {
            return Err(IdentityError::EmailAlreadyInUse(key));
        }

        let account = Account {
            uid: Uuid::new_v4().to_string(),
            password: password.to_string(),
            email_verified: false,
        };
        let created = user(&key, &account);
        state.accounts.insert(key.clone(), account);
        state.current = Some(key);
        info!("Created account {}", created.email);
        Ok(created)
    }

    async fn sign_out(&self) -> IdentityResult<()> {
        self.state.lock().current = None;
        Ok(())
    }

    fn current_user(&self) -> Option<IdentityUser> {
        let state = self.state.lock();
        let key = state.current.as_ref()?;
        state.accounts.get(key).map(|account| user(key, account))
    }

    async fn send_password_reset(&self, email: &str) -> IdentityResult<()> {
        let key = email.trim().to_lowercase();
        let mut state = self.state.lock();
        if !state.accounts.contains_key(&key) {
            return Err(IdentityError::UserNotFound(key));
        }
        state.outbox.push(SentEmail {
            to: key,
            kind: EmailKind::PasswordReset,
        });
        Ok(())
    }

    async fn send_verification_email(&self) -> IdentityResult<()> {
        let mut state = self.state.lock();
        let to = state.current.clone().ok_or(IdentityError::NotSignedIn)?;
        state.outbox.push(SentEmail {
            to,
            kind: EmailKind::Verification,
        });
        Ok(())
    }

    async fn delete_current_user(&self) -> IdentityResult<()> {
        let mut state = self.state.lock();
        let key = state.current.take().ok_or(IdentityError::NotSignedIn)?;
        state.accounts.remove(&key);
        info!("Deleted account {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_and_verify() {
        let identity = InMemoryIdentityProvider::new();
        let created = identity.sign_up("Ana@Example.com", "secreto").await.unwrap();
        assert_eq!(created.email, "ana@example.com");
        assert!(!created.email_verified);

        identity.send_verification_email().await.unwrap();
        assert_eq!(
            identity.outbox(),
            vec![SentEmail {
                to: "ana@example.com".to_string(),
                kind: EmailKind::Verification,
            }]
        );

        assert!(identity.mark_verified("ana@example.com"));
        assert!(identity.current_user().unwrap().email_verified);
    }

    #[tokio::test]
    async fn test_credentials_are_checked() {
        let identity = InMemoryIdentityProvider::new();
        identity.sign_up("ana@example.com", "secreto").await.unwrap();
        identity.sign_out().await.unwrap();
        assert!(identity.current_user().is_none());

        assert_eq!(
            identity.sign_in("ana@example.com", "otra-cosa").await,
            Err(IdentityError::InvalidCredentials)
        );
        assert!(matches!(
            identity.sign_in("luis@example.com", "secreto").await,
            Err(IdentityError::UserNotFound(_))
        ));
        assert!(identity.sign_in("ana@example.com", "secreto").await.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_weak_and_duplicate_sign_ups() {
        let identity = InMemoryIdentityProvider::new();
        assert_eq!(
            identity.sign_up("ana@example.com", "123").await,
            Err(IdentityError::WeakPassword { min_length: 6 })
        );

        identity.sign_up("ana@example.com", "secreto").await.unwrap();
        assert!(matches!(
            identity.sign_up("ANA@example.com", "secreto").await,
            Err(IdentityError::EmailAlreadyInUse(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_requires_session() {
        let identity = InMemoryIdentityProvider::new();
        assert_eq!(
            identity.delete_current_user().await,
            Err(IdentityError::NotSignedIn)
        );

        identity.sign_up("ana@example.com", "secreto").await.unwrap();
        identity.delete_current_user().await.unwrap();
        assert!(identity.current_user().is_none());
        assert!(!identity.mark_verified("ana@example.com"));
    }
}
