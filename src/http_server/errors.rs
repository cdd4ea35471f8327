//! # HTTP API Errors
//!
//! Every failure a handler can produce, and how it is rendered. Clients
//! only ever see a short `{"error": ...}` body; internal detail is logged
//! and dropped.

use std::any::Any;
use std::fmt::Display;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::city::ValidationError;
use crate::store::StoreError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP API errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Request body rejected
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Lookup miss, carries the name as requested
    #[error("City '{0}' not found")]
    CityNotFound(String),

    /// No route matched
    #[error("Endpoint not found")]
    EndpointNotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Anything else. The detail is logged, never returned.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Wrap an unexpected failure with a short description of what failed
    pub fn internal(context: &str, err: impl Display) -> Self {
        ApiError::Internal(format!("{}: {}", context, err))
    }

    /// Wrap a document store failure, flagging an unreachable backend in
    /// the logged detail
    pub fn store(context: &str, err: StoreError) -> Self {
        if err.is_connectivity() {
            ApiError::Internal(format!("{}: document store unreachable: {}", context, err))
        } else {
            ApiError::internal(context, err)
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::CityNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::EndpointNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!("{}", detail);
        }
        let status = self.status_code();
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

/// Fallback for unmatched routes
pub async fn endpoint_not_found() -> ApiError {
    ApiError::EndpointNotFound
}

/// Turn a handler panic into the generic 500 body
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}
