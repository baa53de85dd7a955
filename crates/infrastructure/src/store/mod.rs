//! Document store abstraction
//!
//! A hierarchical key/value store of JSON documents addressed by
//! `collection/id[/collection/id...]` paths, with realtime query
//! subscriptions. Repositories translate entities to and from documents.

pub mod errors;
pub mod memory;
pub mod query;

pub use errors::{StoreError, StoreResult};
pub use memory::InMemoryDocumentStore;
pub use query::{Filter, Query};

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::{Map, Value};
use std::fmt;

/// Field map of one document
pub type Fields = Map<String, Value>;

/// Path of a collection: `lists` or `lists/{id}/items`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

impl CollectionPath {
    pub fn root(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn doc(&self, id: &str) -> DocumentPath {
        DocumentPath(format!("{}/{}", self.0, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path of a single document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath(String);

impl DocumentPath {
    pub fn collection(&self) -> CollectionPath {
        match self.0.rsplit_once('/') {
            Some((parent, _)) => CollectionPath(parent.to_string()),
            None => CollectionPath(String::new()),
        }
    }

    pub fn id(&self) -> &str {
        self.0.rsplit_once('/').map_or(self.0.as_str(), |(_, id)| id)
    }

    /// Nested collection under this document
    pub fn sub_collection(&self, name: &str) -> CollectionPath {
        CollectionPath(format!("{}/{}", self.0, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: DocumentPath,
    pub fields: Fields,
}

impl Document {
    pub fn id(&self) -> &str {
        self.path.id()
    }
}

/// Full result set of a query at one point in time
pub type Snapshot = Vec<Document>;

pub type SnapshotStream = BoxStream<'static, StoreResult<Snapshot>>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Current result set of `query`, then a new one after every change to
    /// the queried collection
    async fn subscribe(&self, query: Query) -> StoreResult<SnapshotStream>;

    async fn get(&self, path: &DocumentPath) -> StoreResult<Document>;

    /// Fails with `AlreadyExists` when the path is taken
    async fn create(&self, path: &DocumentPath, fields: Fields) -> StoreResult<()>;

    /// Merge `fields` into an existing document
    async fn update(&self, path: &DocumentPath, fields: Fields) -> StoreResult<()>;

    /// Remove one document; nested collections are left alone
    async fn delete(&self, path: &DocumentPath) -> StoreResult<()>;
}
