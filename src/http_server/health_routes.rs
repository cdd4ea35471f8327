//! Health HTTP Routes
//!
//! Reports whether the document store currently answers. The probe uses
//! the published handle as-is and never triggers a reconnect.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use super::state::AppState;

/// Health check response
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elasticsearch: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthResponse {
    fn connected() -> Self {
        Self {
            status: "OK",
            elasticsearch: Some("connected"),
            message: None,
        }
    }

    fn disconnected() -> Self {
        Self {
            status: "ERROR",
            elasticsearch: Some("disconnected"),
            message: None,
        }
    }

    fn probe_failed(message: String) -> Self {
        Self {
            status: "ERROR",
            elasticsearch: None,
            message: Some(message),
        }
    }
}

/// Create health routes
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let Some(store) = state.connections.current().await else {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(HealthResponse::disconnected()));
    };

    match store.ping().await {
        Ok(true) => (StatusCode::OK, Json(HealthResponse::connected())),
        Ok(false) => (StatusCode::SERVICE_UNAVAILABLE, Json(HealthResponse::disconnected())),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse::probe_failed(e.to_string())),
        ),
    }
}
