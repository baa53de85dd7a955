use async_trait::async_trait;
use domain::{DomainError, DomainResult, Email, ListId, ListRepository, ListStream, ShoppingList};
use futures::StreamExt;
use serde_json::{json, Map};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::documents::{
    decode_snapshot, from_document, items_collection, list_path, lists_collection, to_fields,
    ListDocument,
};
use super::errors::map_store_error;
use crate::store::{DocumentStore, Query, StoreError};

/// Lists stored as `lists/{id}` documents
pub struct StoreListRepository {
    store: Arc<dyn DocumentStore>,
}

impl StoreListRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ListRepository for StoreListRepository {
    #[instrument(skip(self))]
    async fn lists_stream(&self, member: &Email) -> DomainResult<ListStream> {
        let query = Query::collection(lists_collection())
            .array_contains("sharedWith", member.as_str())
            .order_by("createdAt");
        let snapshots = self.store.subscribe(query).await.map_err(map_store_error)?;

        Ok(snapshots
            .map(|snapshot| {
                snapshot
                    .map(|documents| decode_snapshot(&documents, ListDocument::into_entity))
                    .map_err(map_store_error)
            })
            .boxed())
    }

    async fn get_list(&self, id: &ListId) -> DomainResult<ShoppingList> {
        let document = self.store.get(&list_path(id)).await.map_err(|e| match e {
            StoreError::NotFound(_) => DomainError::not_found("list", id.as_str()),
            other => map_store_error(other),
        })?;
        let decoded: ListDocument = from_document(&document).map_err(map_store_error)?;
        Ok(decoded.into_entity(id.as_str()))
    }

    async fn create_list(&self, list: &ShoppingList) -> DomainResult<()> {
        let fields = to_fields(&ListDocument::from_entity(list)).map_err(map_store_error)?;
        self.store
            .create(&list_path(list.id()), fields)
            .await
            .map_err(map_store_error)
    }

    async fn update_members(&self, list: &ShoppingList) -> DomainResult<()> {
        let members: Vec<&str> = list.shared_with().iter().map(Email::as_str).collect();
        let mut fields = Map::new();
        fields.insert("sharedWith".to_string(), json!(members));

        self.store
            .update(&list_path(list.id()), fields)
            .await
            .map_err(map_store_error)
    }

    /// Delete the items found in one read of the sub-collection, then the list
    #[instrument(skip(self))]
    async fn delete_list(&self, id: &ListId) -> DomainResult<()> {
        let mut items = self
            .store
            .subscribe(Query::collection(items_collection(id)))
            .await
            .map_err(map_store_error)?;
        let documents = match items.next().await {
            Some(snapshot) => snapshot.map_err(map_store_error)?,
            None => Vec::new(),
        };
        drop(items);

        for document in &documents {
            if let Err(e) = self.store.delete(&document.path).await {
                warn!("Failed to delete item {}: {}", document.path, e);
            }
        }
        debug!("Deleted {} items of list {}", documents.len(), id);

        self.store
            .delete(&list_path(id))
            .await
            .map_err(map_store_error)?;
        info!("Deleted list {}", id);
        Ok(())
    }
}
