//! # Document Store Traits

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::errors::StoreResult;
use super::schema::IndexSchema;
use crate::city::{CityRecord, WriteOutcome};

/// A live handle to a document store holding city records.
///
/// Implementations are shared between requests behind an `Arc` and must
/// not keep any per-request state.
#[async_trait]
pub trait DocumentStore: Send + Sync + fmt::Debug {
    /// Lightweight liveness probe; `Ok(false)` means unreachable
    async fn ping(&self) -> StoreResult<bool>;

    /// Check if an index exists
    async fn index_exists(&self, index: &str) -> StoreResult<bool>;

    /// Create an index with the given field mapping
    async fn create_index(&self, schema: &IndexSchema) -> StoreResult<()>;

    /// Insert or fully overwrite the document stored under `id`
    async fn put(&self, index: &str, id: &str, record: &CityRecord) -> StoreResult<WriteOutcome>;

    /// Fetch the document stored under `id`
    async fn get(&self, index: &str, id: &str) -> StoreResult<CityRecord>;

    /// Return up to `limit` documents in backend order
    async fn search_all(&self, index: &str, limit: usize) -> StoreResult<Vec<CityRecord>>;
}

/// Shared handle to a connected store
pub type StoreHandle = Arc<dyn DocumentStore>;

/// Factory for fresh store handles.
///
/// `connect` only builds the client; liveness is verified by the caller.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self) -> StoreResult<StoreHandle>;

    /// Human readable target, used in log lines and errors
    fn describe(&self) -> String;
}
