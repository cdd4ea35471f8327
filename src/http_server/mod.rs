//! # HTTP Server Module
//!
//! JSON API over the city store, served with Axum.
//!
//! # Endpoints
//!
//! - `GET /health` - Document store connectivity
//! - `POST|PUT /city` - Insert or update a city
//! - `GET /city/:name` - Look up a city, case-insensitive
//! - `GET /cities` - List cities (capped)

pub mod city_routes;
pub mod config;
pub mod errors;
pub mod health_routes;
pub mod server;
pub mod state;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::{build_router, HttpServer};
pub use state::AppState;
