//! In-process profile store for tests and embedders without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::traits::{DocumentSnapshot, ProfileStore, merge_document};

/// `HashMap`-backed document store.
#[derive(Default)]
pub struct MemoryProfileStore {
    documents: RwLock<HashMap<(String, String), Value>>,
    /// Number of upcoming writes to reject (fault injection for tests).
    fail_next_writes: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` merge-writes fail with `StoreError::Unavailable`.
    pub fn fail_next_writes(&self, n: usize) {
        self.fail_next_writes.store(n, Ordering::SeqCst);
    }

    /// Number of merge-writes that reached the store, failed ones included.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn merge_write(
        &self,
        collection: &str,
        key: &str,
        payload: &Value,
    ) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        let injected = self
            .fail_next_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(StoreError::Unavailable(format!(
                "write to {collection}/{key} rejected"
            )));
        }

        if !payload.is_object() {
            return Err(StoreError::NotAnObject {
                collection: collection.to_string(),
                key: key.to_string(),
            });
        }

        let mut documents = self.documents.write().await;
        let doc = documents
            .entry((collection.to_string(), key.to_string()))
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        merge_document(doc, payload);
        Ok(())
    }

    async fn read(&self, collection: &str, key: &str) -> Result<DocumentSnapshot, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .get(&(collection.to_string(), key.to_string()))
            .cloned()
            .map(DocumentSnapshot::found)
            .unwrap_or_else(DocumentSnapshot::missing))
    }
}

/// Memory store whose writes wait for a permit before landing.
#[cfg(test)]
pub(crate) struct GatedProfileStore {
    inner: MemoryProfileStore,
    gate: tokio::sync::Semaphore,
}

#[cfg(test)]
impl GatedProfileStore {
    pub(crate) fn new() -> Self {
        Self {
            inner: MemoryProfileStore::new(),
            gate: tokio::sync::Semaphore::new(0),
        }
    }

    /// Let `n` more writes through.
    pub(crate) fn open(&self, n: usize) {
        self.gate.add_permits(n);
    }

    /// Writes that got past the gate.
    pub(crate) fn write_count(&self) -> usize {
        self.inner.write_count()
    }
}

#[cfg(test)]
#[async_trait]
impl ProfileStore for GatedProfileStore {
    async fn merge_write(
        &self,
        collection: &str,
        key: &str,
        payload: &Value,
    ) -> Result<(), StoreError> {
        self.gate
            .acquire()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .forget();
        self.inner.merge_write(collection, key, payload).await
    }

    async fn read(&self, collection: &str, key: &str) -> Result<DocumentSnapshot, StoreError> {
        self.inner.read(collection, key).await
    }
}
