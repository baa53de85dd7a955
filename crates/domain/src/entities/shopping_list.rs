//! ShoppingList - named, typed list shared among accounts by email

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ListId;
use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{is_blank, Email, ListContext};

/// Result of removing a member from a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    /// Other members remain; the list persists for them
    Left,
    /// Last member left; the list must be deleted
    Deleted,
    /// The email was not a member, nothing changed
    NotAMember,
}

/// List owned by the remote store.
///
/// `shared_with` holds normalized emails and contains the creator at
/// creation time. Membership is flat: every member has the same rights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingList {
    id: ListId,
    name: String,
    created_at: DateTime<Utc>,
    context: ListContext,
    shared_with: BTreeSet<Email>,
}

impl ShoppingList {
    /// Create a new list owned by `creator`
    pub fn new(name: &str, context: ListContext, creator: Email) -> DomainResult<Self> {
        if is_blank(name) {
            return Err(DomainError::EmptyName);
        }

        Ok(Self {
            id: ListId::generate(),
            name: name.trim().to_string(),
            created_at: Utc::now(),
            context,
            shared_with: BTreeSet::from([creator]),
        })
    }

    /// Reconstruct a list read back from storage
    pub fn restore(
        id: ListId,
        name: String,
        created_at: DateTime<Utc>,
        context: ListContext,
        shared_with: BTreeSet<Email>,
    ) -> Self {
        Self {
            id,
            name,
            created_at,
            context,
            shared_with,
        }
    }

    pub fn id(&self) -> &ListId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn context(&self) -> ListContext {
        self.context
    }

    pub fn shared_with(&self) -> &BTreeSet<Email> {
        &self.shared_with
    }

    pub fn is_member(&self, email: &Email) -> bool {
        self.shared_with.contains(email)
    }

    /// Add a member. Returns false when the email already had access.
    pub fn share_with(&mut self, email: Email) -> bool {
        self.shared_with.insert(email)
    }

    /// Remove a member; the list is gone once nobody is left
    pub fn remove_member(&mut self, email: &Email) -> MembershipChange {
        if !self.shared_with.remove(email) {
            return MembershipChange::NotAMember;
        }

        if self.shared_with.is_empty() {
            MembershipChange::Deleted
        } else {
            MembershipChange::Left
        }
    }
}
