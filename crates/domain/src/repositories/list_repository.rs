//! ListRepository - Domain abstraction for list persistence

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::entities::{ListId, ShoppingList};
use crate::errors::DomainResult;
use crate::value_objects::Email;

/// Realtime sequence of list snapshots; every element replaces the previous one
pub type ListStream = BoxStream<'static, DomainResult<Vec<ShoppingList>>>;

/// Repository abstraction for shared lists
///
/// Domain defines the interface, infrastructure translates it into store
/// documents and queries.
#[async_trait]
pub trait ListRepository: Send + Sync {
    /// Subscribe to the lists `member` belongs to, oldest first
    async fn lists_stream(&self, member: &Email) -> DomainResult<ListStream>;

    /// Read one list
    async fn get_list(&self, id: &ListId) -> DomainResult<ShoppingList>;

    /// Persist a new list
    async fn create_list(&self, list: &ShoppingList) -> DomainResult<()>;

    /// Persist the membership set of an existing list
    async fn update_members(&self, list: &ShoppingList) -> DomainResult<()>;

    /// Delete a list and its items
    async fn delete_list(&self, id: &ListId) -> DomainResult<()>;
}
