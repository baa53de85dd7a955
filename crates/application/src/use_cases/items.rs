use domain::{ItemId, ItemRepository, ItemStream, ListId, ListItem};
use std::sync::Arc;

use crate::ApplicationResult;

/// Use Case: pass-through access to the items of a list
pub struct ItemUseCase {
    repository: Arc<dyn ItemRepository>,
}

impl ItemUseCase {
    pub fn new(repository: Arc<dyn ItemRepository>) -> Self {
        Self { repository }
    }

    pub async fn items_stream(&self, list_id: &ListId) -> ApplicationResult<ItemStream> {
        Ok(self.repository.items_stream(list_id).await?)
    }

    pub async fn add(&self, item: &ListItem) -> ApplicationResult<()> {
        Ok(self.repository.add_item(item).await?)
    }

    pub async fn update(&self, item: &ListItem) -> ApplicationResult<()> {
        Ok(self.repository.update_item(item).await?)
    }

    pub async fn delete(&self, list_id: &ListId, item_id: &ItemId) -> ApplicationResult<()> {
        Ok(self.repository.delete_item(list_id, item_id).await?)
    }

    pub async fn update_orders(&self, items: &[ListItem]) -> ApplicationResult<()> {
        if items.is_empty() {
            return Ok(());
        }
        Ok(self.repository.update_orders(items).await?)
    }
}
