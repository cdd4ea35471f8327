//! Index schema initialization
//!
//! The service owns exactly one index. Creating it is idempotent: an
//! existing index is left untouched, whatever its mapping.

use serde_json::{json, Map, Value};

use super::backend::DocumentStore;
use super::errors::StoreResult;
use crate::observability::{log_event, Event};

/// Name of the index holding city records
pub const CITIES_INDEX: &str = "cities";

/// Field types used by the city mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Exact-match string, not analyzed
    Keyword,
    /// Signed 64-bit integer
    Long,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Keyword => "keyword",
            FieldType::Long => "long",
        }
    }
}

/// Index name plus field mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    pub name: String,
    pub fields: Vec<(String, FieldType)>,
}

impl IndexSchema {
    /// The `cities` index: `city` as keyword, `population` as long
    pub fn cities() -> Self {
        Self {
            name: CITIES_INDEX.to_string(),
            fields: vec![
                ("city".to_string(), FieldType::Keyword),
                ("population".to_string(), FieldType::Long),
            ],
        }
    }

    /// Index creation body in Elasticsearch mapping form
    pub fn to_mapping(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, ty)| (name.clone(), json!({ "type": ty.as_str() })))
            .collect();
        json!({ "mappings": { "properties": properties } })
    }
}

/// Create the index if it does not exist yet.
///
/// Returns `true` when the index was created by this call.
pub async fn ensure_schema(store: &dyn DocumentStore, schema: &IndexSchema) -> StoreResult<bool> {
    if store.index_exists(&schema.name).await? {
        return Ok(false);
    }
    store.create_index(schema).await?;
    log_event!(Event::IndexCreated, index = %schema.name);
    Ok(true)
}
