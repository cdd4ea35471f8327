//! # Document Store
//!
//! Everything between the HTTP handlers and the remote search engine:
//!
//! - `DocumentStore` / `StoreConnector` traits
//! - Elasticsearch and in-memory backends
//! - Connection management with bounded retry
//! - Index schema initialization

mod backend;
mod config;
mod connection;
mod elasticsearch;
mod errors;
mod memory;
mod schema;

pub use backend::{DocumentStore, StoreConnector, StoreHandle};
pub use config::StoreConfig;
pub use connection::{ConnectionManager, RetryPolicy};
pub use elasticsearch::{ElasticsearchConnector, ElasticsearchStore};
pub use errors::{StoreError, StoreResult};
pub use memory::{MemoryConnector, MemoryStore};
pub use schema::{ensure_schema, FieldType, IndexSchema, CITIES_INDEX};
