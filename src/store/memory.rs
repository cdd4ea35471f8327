//! # In-Memory Document Store
//!
//! Process-local store with the same observable semantics as the
//! Elasticsearch backend. Used for local development and tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::backend::{DocumentStore, StoreConnector, StoreHandle};
use super::errors::{StoreError, StoreResult};
use super::schema::IndexSchema;
use crate::city::{CityRecord, WriteOutcome};

type Index = BTreeMap<String, CityRecord>;

/// In-memory document store
#[derive(Debug)]
pub struct MemoryStore {
    indices: RwLock<HashMap<String, Index>>,
    reachable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            indices: RwLock::new(HashMap::new()),
            reachable: AtomicBool::new(true),
        }
    }

    /// Simulate the backend going away or coming back
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> StoreResult<()> {
        if self.is_reachable() {
            Ok(())
        } else {
            Err(StoreError::Connection("memory store is unreachable".to_string()))
        }
    }

    /// Number of documents in an index (0 if the index is missing)
    pub async fn len(&self, index: &str) -> usize {
        self.indices
            .read()
            .await
            .get(index)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> StoreResult<bool> {
        Ok(self.is_reachable())
    }

    async fn index_exists(&self, index: &str) -> StoreResult<bool> {
        self.check_reachable()?;
        Ok(self.indices.read().await.contains_key(index))
    }

    async fn create_index(&self, schema: &IndexSchema) -> StoreResult<()> {
        self.check_reachable()?;
        self.indices
            .write()
            .await
            .entry(schema.name.clone())
            .or_default();
        Ok(())
    }

    async fn put(&self, index: &str, id: &str, record: &CityRecord) -> StoreResult<WriteOutcome> {
        self.check_reachable()?;
        // Writing to a missing index creates it, like Elasticsearch does
        let mut indices = self.indices.write().await;
        let previous = indices
            .entry(index.to_string())
            .or_default()
            .insert(id.to_string(), record.clone());
        Ok(match previous {
            Some(_) => WriteOutcome::Updated,
            None => WriteOutcome::Created,
        })
    }

    async fn get(&self, index: &str, id: &str) -> StoreResult<CityRecord> {
        self.check_reachable()?;
        let indices = self.indices.read().await;
        let docs = indices
            .get(index)
            .ok_or_else(|| StoreError::IndexNotFound(index.to_string()))?;
        docs.get(id).cloned().ok_or_else(|| StoreError::NotFound {
            index: index.to_string(),
            id: id.to_string(),
        })
    }

    async fn search_all(&self, index: &str, limit: usize) -> StoreResult<Vec<CityRecord>> {
        self.check_reachable()?;
        let indices = self.indices.read().await;
        let docs = indices
            .get(index)
            .ok_or_else(|| StoreError::IndexNotFound(index.to_string()))?;
        Ok(docs.values().take(limit).cloned().collect())
    }
}

/// Connector handing out one shared [`MemoryStore`]
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    store: Arc<MemoryStore>,
}

impl MemoryConnector {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StoreConnector for MemoryConnector {
    async fn connect(&self) -> StoreResult<StoreHandle> {
        self.store.check_reachable()?;
        let handle: StoreHandle = self.store.clone();
        Ok(handle)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
