//! Store document layout
//!
//! `lists/{listId}`: `{ name, createdAt, contextTag, sharedWith[] }`
//! `lists/{listId}/items/{itemId}`:
//! `{ parentListId, name, isDone, order, addedByAI, sourceDish? }`

use chrono::{DateTime, Utc};
use domain::{Email, ItemId, ListContext, ListId, ListItem, ShoppingList};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::warn;

use crate::store::{CollectionPath, Document, DocumentPath, Fields, StoreError, StoreResult};

pub const LISTS_COLLECTION: &str = "lists";
pub const ITEMS_COLLECTION: &str = "items";

pub fn lists_collection() -> CollectionPath {
    CollectionPath::root(LISTS_COLLECTION)
}

pub fn list_path(id: &ListId) -> DocumentPath {
    lists_collection().doc(id.as_str())
}

pub fn items_collection(list_id: &ListId) -> CollectionPath {
    list_path(list_id).sub_collection(ITEMS_COLLECTION)
}

pub fn item_path(list_id: &ListId, item_id: &ItemId) -> DocumentPath {
    items_collection(list_id).doc(item_id.as_str())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocument {
    pub name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub context_tag: String,
    #[serde(default)]
    pub shared_with: Vec<String>,
}

impl ListDocument {
    pub fn from_entity(list: &ShoppingList) -> Self {
        Self {
            name: list.name().to_string(),
            created_at: list.created_at(),
            context_tag: list.context().as_str().to_string(),
            shared_with: list.shared_with().iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn into_entity(self, id: &str) -> ShoppingList {
        let context = ListContext::from_str(&self.context_tag).unwrap_or_else(|_| {
            if !self.context_tag.is_empty() {
                warn!("List {} has unknown context '{}'", id, self.context_tag);
            }
            ListContext::default()
        });

        let shared_with: BTreeSet<Email> = self
            .shared_with
            .iter()
            .filter_map(|raw| match Email::parse(raw) {
                Ok(email) => Some(email),
                Err(_) => {
                    warn!("List {} has malformed member '{}'", id, raw);
                    None
                }
            })
            .collect();

        ShoppingList::restore(ListId::from(id), self.name, self.created_at, context, shared_with)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDocument {
    pub parent_list_id: String,
    pub name: String,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(rename = "addedByAI", default)]
    pub added_by_ai: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dish: Option<String>,
}

impl ItemDocument {
    pub fn from_entity(item: &ListItem) -> Self {
        Self {
            parent_list_id: item.list_id().to_string(),
            name: item.name().to_string(),
            is_done: item.is_done(),
            order: item.order(),
            added_by_ai: item.added_by_ai(),
            source_dish: item.source_dish().map(str::to_string),
        }
    }

    pub fn into_entity(self, id: &str) -> ListItem {
        ListItem::restore(
            ItemId::from(id),
            ListId::from(self.parent_list_id),
            self.name,
            self.is_done,
            self.order,
            self.added_by_ai,
            self.source_dish,
        )
    }
}

pub fn to_fields<T: Serialize>(value: &T) -> StoreResult<Fields> {
    match serde_json::to_value(value).map_err(StoreError::invalid_data)? {
        serde_json::Value::Object(fields) => Ok(fields),
        other => Err(StoreError::InvalidData(format!(
            "expected an object, got {other}"
        ))),
    }
}

pub fn from_document<T: for<'de> Deserialize<'de>>(document: &Document) -> StoreResult<T> {
    serde_json::from_value(serde_json::Value::Object(document.fields.clone()))
        .map_err(|e| StoreError::InvalidData(format!("{}: {}", document.path, e)))
}

/// Decode every document of a snapshot, skipping the ones that do not fit
pub fn decode_snapshot<T, E>(documents: &[Document], into_entity: impl Fn(T, &str) -> E) -> Vec<E>
where
    T: for<'de> Deserialize<'de>,
{
    documents
        .iter()
        .filter_map(|document| match from_document::<T>(document) {
            Ok(decoded) => Some(into_entity(decoded, document.id())),
            Err(e) => {
                warn!("Skipping undecodable document: {}", e);
                None
            }
        })
        .collect()
}
