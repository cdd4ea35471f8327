//! # Document Store Errors

use thiserror::Error;

/// Result type for document store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    // Connectivity
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Could not connect to document store at {target} after {attempts} attempts")]
    ConnectFailed { target: String, attempts: u32 },

    // Lookups
    #[error("Document not found: {index}/{id}")]
    NotFound { index: String, id: String },

    #[error("Index not found: {0}")]
    IndexNotFound(String),

    // Backend replies
    #[error("Backend returned {status}: {reason}")]
    Backend { status: u16, reason: String },

    #[error("Malformed backend response: {0}")]
    Decode(String),

    #[error("Invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    /// True if the backend could not be reached at all
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            StoreError::Connection(_) | StoreError::ConnectFailed { .. }
        )
    }

    /// True for a lookup miss, whether the document or its index is absent
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound { .. } | StoreError::IndexNotFound(_)
        )
    }
}
