//! In-process document store with realtime subscriptions
//!
//! Documents live in a `BTreeMap` keyed by path. Every write broadcasts the
//! changed collection; subscribers re-run their query when it matches.

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::{
    CollectionPath, Document, DocumentPath, DocumentStore, Fields, Query, Snapshot,
    SnapshotStream, StoreError, StoreResult,
};

const CHANGE_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct InMemoryDocumentStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    documents: RwLock<BTreeMap<DocumentPath, Fields>>,
    changes: broadcast::Sender<CollectionPath>,
    unavailable: AtomicBool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(StoreInner {
                documents: RwLock::new(BTreeMap::new()),
                changes,
                unavailable: AtomicBool::new(false),
            }),
        }
    }

    /// Make every write fail with `Unavailable` until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.inner.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreInner {
    fn run_query(&self, query: &Query) -> Snapshot {
        let documents = self.documents.read();
        let mut snapshot: Snapshot = documents
            .iter()
            .map(|(path, fields)| Document {
                path: path.clone(),
                fields: fields.clone(),
            })
            .filter(|document| query.matches(document))
            .collect();
        query.sort(&mut snapshot);
        snapshot
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        Ok(())
    }

    fn notify(&self, path: &DocumentPath) {
        // no receivers is fine
        let _ = self.changes.send(path.collection());
    }
}

struct Subscription {
    store: Weak<StoreInner>,
    changes: broadcast::Receiver<CollectionPath>,
    query: Query,
    initial: Option<Snapshot>,
}

impl Subscription {
    async fn next_snapshot(mut self) -> Option<(StoreResult<Snapshot>, Self)> {
        if let Some(snapshot) = self.initial.take() {
            return Some((Ok(snapshot), self));
        }

        loop {
            match self.changes.recv().await {
                Ok(collection) if collection == self.query.collection => break,
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Subscription lagged by {} changes, resending snapshot", skipped);
                    break;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }

        let store = self.store.upgrade()?;
        let snapshot = store.run_query(&self.query);
        drop(store);
        Some((Ok(snapshot), self))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn subscribe(&self, query: Query) -> StoreResult<SnapshotStream> {
        // subscribe before reading so no change falls between the two
        let changes = self.inner.changes.subscribe();
        let initial = self.inner.run_query(&query);
        debug!(
            "New subscription on {} ({} documents)",
            query.collection,
            initial.len()
        );

        let subscription = Subscription {
            store: Arc::downgrade(&self.inner),
            changes,
            query,
            initial: Some(initial),
        };
        Ok(futures::stream::unfold(subscription, Subscription::next_snapshot).boxed())
    }

    async fn get(&self, path: &DocumentPath) -> StoreResult<Document> {
        self.inner
            .documents
            .read()
            .get(path)
            .map(|fields| Document {
                path: path.clone(),
                fields: fields.clone(),
            })
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    async fn create(&self, path: &DocumentPath, fields: Fields) -> StoreResult<()> {
        self.inner.check_available()?;
        {
            let mut documents = self.inner.documents.write();
            if documents.contains_key(path) {
                return Err(StoreError::AlreadyExists(path.to_string()));
            }
            documents.insert(path.clone(), fields);
        }
        self.inner.notify(path);
        Ok(())
    }

    async fn update(&self, path: &DocumentPath, fields: Fields) -> StoreResult<()> {
        self.inner.check_available()?;
        {
            let mut documents = self.inner.documents.write();
            let existing = documents
                .get_mut(path)
                .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
            existing.extend(fields);
        }
        self.inner.notify(path);
        Ok(())
    }

    async fn delete(&self, path: &DocumentPath) -> StoreResult<()> {
        self.inner.check_available()?;
        let removed = self.inner.documents.write().remove(path).is_some();
        if removed {
            self.inner.notify(path);
        }
        Ok(())
    }
}
