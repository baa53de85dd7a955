//! ItemRepository - Domain abstraction for item persistence

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::entities::{ItemId, ListId, ListItem};
use crate::errors::DomainResult;

/// Realtime sequence of item snapshots for one list, sorted by order key
pub type ItemStream = BoxStream<'static, DomainResult<Vec<ListItem>>>;

#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Subscribe to the items of one list
    async fn items_stream(&self, list_id: &ListId) -> DomainResult<ItemStream>;

    /// Persist a new item under its list
    async fn add_item(&self, item: &ListItem) -> DomainResult<()>;

    /// Overwrite name, done flag and order of an existing item
    async fn update_item(&self, item: &ListItem) -> DomainResult<()>;

    async fn delete_item(&self, list_id: &ListId, item_id: &ItemId) -> DomainResult<()>;

    /// Persist the order keys of several items after a reorder
    async fn update_orders(&self, items: &[ListItem]) -> DomainResult<()>;
}
