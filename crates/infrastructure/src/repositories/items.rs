use async_trait::async_trait;
use domain::services::sort_by_order;
use domain::{DomainResult, ItemId, ItemRepository, ItemStream, ListId, ListItem};
use futures::StreamExt;
use serde_json::{json, Map};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::documents::{decode_snapshot, item_path, items_collection, to_fields, ItemDocument};
use super::errors::map_store_error;
use crate::store::{DocumentStore, Query};

/// Items stored under `lists/{listId}/items/{itemId}`
pub struct StoreItemRepository {
    store: Arc<dyn DocumentStore>,
}

impl StoreItemRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ItemRepository for StoreItemRepository {
    #[instrument(skip(self))]
    async fn items_stream(&self, list_id: &ListId) -> DomainResult<ItemStream> {
        let query = Query::collection(items_collection(list_id)).order_by("order");
        let snapshots = self.store.subscribe(query).await.map_err(map_store_error)?;

        Ok(snapshots
            .map(|snapshot| {
                snapshot
                    .map(|documents| {
                        let mut items = decode_snapshot(&documents, ItemDocument::into_entity);
                        sort_by_order(&mut items);
                        items
                    })
                    .map_err(map_store_error)
            })
            .boxed())
    }

    async fn add_item(&self, item: &ListItem) -> DomainResult<()> {
        let fields = to_fields(&ItemDocument::from_entity(item)).map_err(map_store_error)?;
        self.store
            .create(&item_path(item.list_id(), item.id()), fields)
            .await
            .map_err(map_store_error)
    }

    async fn update_item(&self, item: &ListItem) -> DomainResult<()> {
        let mut fields = Map::new();
        fields.insert("name".to_string(), json!(item.name()));
        fields.insert("isDone".to_string(), json!(item.is_done()));
        fields.insert("order".to_string(), json!(item.order()));

        self.store
            .update(&item_path(item.list_id(), item.id()), fields)
            .await
            .map_err(map_store_error)
    }

    async fn delete_item(&self, list_id: &ListId, item_id: &ItemId) -> DomainResult<()> {
        self.store
            .delete(&item_path(list_id, item_id))
            .await
            .map_err(map_store_error)
    }

    /// One update per item; stops at the first failure
    async fn update_orders(&self, items: &[ListItem]) -> DomainResult<()> {
        for item in items {
            let mut fields = Map::new();
            fields.insert("order".to_string(), json!(item.order()));
            self.store
                .update(&item_path(item.list_id(), item.id()), fields)
                .await
                .map_err(map_store_error)?;
        }
        debug!("Persisted order of {} items", items.len());
        Ok(())
    }
}
