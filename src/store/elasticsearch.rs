//! # Elasticsearch Backend
//!
//! Talks to the Elasticsearch REST API over plain HTTP with `reqwest`.
//! Only the handful of endpoints the service needs are used:
//!
//! - `HEAD /` liveness
//! - `HEAD /{index}` / `PUT /{index}` index management
//! - `POST /_bulk` single document writes
//! - `POST /{index}/_mget` single document reads
//! - `POST /{index}/_search` match-all listing
//!
//! Document ids are city names and may be anything, including `.` or `..`,
//! which URL parsing would collapse as dot segments. Ids therefore travel in
//! request bodies only; URL paths carry index names and API endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::backend::{DocumentStore, StoreConnector, StoreHandle};
use super::config::StoreConfig;
use super::errors::{StoreError, StoreResult};
use super::schema::IndexSchema;
use crate::city::{CityRecord, WriteOutcome};

const ALREADY_EXISTS: &str = "resource_already_exists_exception";
const INDEX_NOT_FOUND: &str = "index_not_found_exception";

/// Elasticsearch-backed document store
#[derive(Debug, Clone)]
pub struct ElasticsearchStore {
    client: Client,
    base_url: Url,
}

// ==================
// Wire types
// ==================

#[derive(Debug, Deserialize)]
struct BulkResponse {
    items: Vec<BulkItem>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    index: BulkItemResult,
}

#[derive(Debug, Deserialize)]
struct BulkItemResult {
    status: u16,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<ErrorCause>,
}

#[derive(Debug, Deserialize)]
struct MgetResponse {
    docs: Vec<MgetDoc>,
}

#[derive(Debug, Deserialize)]
struct MgetDoc {
    #[serde(default)]
    found: bool,
    #[serde(default, rename = "_source")]
    source: Option<CityRecord>,
    #[serde(default)]
    error: Option<ErrorCause>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_source")]
    source: CityRecord,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorCause,
}

#[derive(Debug, Deserialize)]
struct ErrorCause {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    reason: Option<String>,
}

impl ElasticsearchStore {
    /// Build a client for the configured cluster. Does not touch the network.
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let base_url = Url::parse(&config.base_url())
            .map_err(|e| StoreError::Config(format!("invalid address {}: {}", config.target(), e)))?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, base_url })
    }

    /// Base URL with percent-encoded path segments appended
    fn url(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Config(format!("{} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    StoreError::Connection(err.to_string())
}

async fn read_body(response: Response) -> StoreResult<String> {
    response.text().await.map_err(transport_error)
}

async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> StoreResult<T> {
    let body = read_body(response).await?;
    serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
}

/// Error type reported by Elasticsearch, e.g. `index_not_found_exception`
fn error_kind(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error.kind)
}

fn backend_error(status: StatusCode, body: &str) -> StoreError {
    let reason = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error.reason.unwrap_or(b.error.kind))
        .unwrap_or_else(|| body.chars().take(200).collect());
    StoreError::Backend {
        status: status.as_u16(),
        reason,
    }
}

/// NDJSON body indexing one document under an explicit id
fn bulk_index_body(index: &str, id: &str, record: &CityRecord) -> StoreResult<String> {
    let action = json!({ "index": { "_index": index, "_id": id } });
    let source = serde_json::to_string(record).map_err(|e| StoreError::Decode(e.to_string()))?;
    Ok(format!("{}\n{}\n", action, source))
}

/// Map the `result` field of an index response
fn write_outcome(result: &str) -> WriteOutcome {
    if result == "updated" {
        WriteOutcome::Updated
    } else {
        WriteOutcome::Created
    }
}

#[async_trait]
impl DocumentStore for ElasticsearchStore {
    async fn ping(&self) -> StoreResult<bool> {
        let url = self.url(&[])?;
        match self.client.head(url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                debug!(error = %e, "elasticsearch ping failed");
                Ok(false)
            }
        }
    }

    async fn index_exists(&self, index: &str) -> StoreResult<bool> {
        let response = self
            .client
            .head(self.url(&[index])?)
            .send()
            .await
            .map_err(transport_error)?;
        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(backend_error(status, "")),
        }
    }

    async fn create_index(&self, schema: &IndexSchema) -> StoreResult<()> {
        let response = self
            .client
            .put(self.url(&[schema.name.as_str()])?)
            .json(&schema.to_mapping())
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = read_body(response).await?;
        // Lost a creation race with another instance; the index is there
        if status == StatusCode::BAD_REQUEST && error_kind(&body).as_deref() == Some(ALREADY_EXISTS) {
            return Ok(());
        }
        Err(backend_error(status, &body))
    }

    async fn put(&self, index: &str, id: &str, record: &CityRecord) -> StoreResult<WriteOutcome> {
        let response = self
            .client
            .post(self.url(&["_bulk"])?)
            .header(CONTENT_TYPE, "application/x-ndjson")
            .body(bulk_index_body(index, id, record)?)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await?;
            return Err(backend_error(status, &body));
        }
        let reply: BulkResponse = decode(response).await?;
        let item = reply
            .items
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("bulk response has no items".to_string()))?
            .index;
        if let Some(cause) = item.error {
            return Err(StoreError::Backend {
                status: item.status,
                reason: cause.reason.unwrap_or(cause.kind),
            });
        }
        Ok(write_outcome(item.result.as_deref().unwrap_or_default()))
    }

    async fn get(&self, index: &str, id: &str) -> StoreResult<CityRecord> {
        let response = self
            .client
            .post(self.url(&[index, "_mget"])?)
            .json(&json!({ "ids": [id] }))
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await?;
            if status == StatusCode::NOT_FOUND && error_kind(&body).as_deref() == Some(INDEX_NOT_FOUND) {
                return Err(StoreError::IndexNotFound(index.to_string()));
            }
            return Err(backend_error(status, &body));
        }
        let reply: MgetResponse = decode(response).await?;
        let doc = reply
            .docs
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("mget response has no docs".to_string()))?;
        match doc {
            MgetDoc { error: Some(cause), .. } if cause.kind == INDEX_NOT_FOUND => {
                Err(StoreError::IndexNotFound(index.to_string()))
            }
            MgetDoc { error: Some(cause), .. } => Err(StoreError::Backend {
                status: status.as_u16(),
                reason: cause.reason.unwrap_or(cause.kind),
            }),
            MgetDoc { found: true, source: Some(record), .. } => Ok(record),
            _ => Err(StoreError::NotFound {
                index: index.to_string(),
                id: id.to_string(),
            }),
        }
    }

    async fn search_all(&self, index: &str, limit: usize) -> StoreResult<Vec<CityRecord>> {
        let query = json!({
            "query": { "match_all": {} },
            "size": limit,
        });
        let response = self
            .client
            .post(self.url(&[index, "_search"])?)
            .json(&query)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::IndexNotFound(index.to_string()));
        }
        if !status.is_success() {
            let body = read_body(response).await?;
            return Err(backend_error(status, &body));
        }
        let reply: SearchResponse = decode(response).await?;
        Ok(reply.hits.hits.into_iter().map(|hit| hit.source).collect())
    }
}

/// Connector building a fresh [`ElasticsearchStore`] per attempt
#[derive(Debug, Clone)]
pub struct ElasticsearchConnector {
    config: StoreConfig,
}

impl ElasticsearchConnector {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl StoreConnector for ElasticsearchConnector {
    async fn connect(&self) -> StoreResult<StoreHandle> {
        let store: StoreHandle = Arc::new(ElasticsearchStore::new(&self.config)?);
        Ok(store)
    }

    fn describe(&self) -> String {
        self.config.target()
    }
}
