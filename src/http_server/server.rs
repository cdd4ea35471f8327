//! # HTTP Server
//!
//! Combines the route groups, the error fallback and the tower layers into
//! one router and serves it until Ctrl-C.

use std::io;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use super::city_routes::city_routes;
use super::config::HttpServerConfig;
use super::errors::{endpoint_not_found, panic_response};
use super::health_routes::health_routes;
use super::state::AppState;
use crate::observability::{log_event, Event};

/// Build the full API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes(state.clone()))
        .merge(city_routes(state))
        .fallback(endpoint_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}

/// HTTP server for the city population API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server listening where `config` says
    pub fn with_config(config: HttpServerConfig, state: AppState) -> Self {
        let router = build_router(state);
        Self { config, router }
    }

    /// Bind and serve until Ctrl-C
    pub async fn start(self) -> Result<(), io::Error> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        let addr = listener.local_addr()?;
        log_event!(Event::Serving, addr = %addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event!(Event::ShutdownComplete);
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    log_event!(Event::ShutdownStart);
}
