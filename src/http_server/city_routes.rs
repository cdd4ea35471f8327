//! City HTTP Routes
//!
//! Upsert, point lookup and listing of city records. Each handler makes at
//! most one store call after making sure a connection exists.

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::errors::{ApiError, ApiResult};
use super::state::AppState;
use crate::city::{normalize_key, CityRecord, UpsertInput};

/// Upper bound on records returned by `GET /cities`. There is no paging;
/// anything past this is silently left out.
pub const MAX_LISTED_CITIES: usize = 10_000;

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct UpsertResponse {
    pub message: String,
    pub city: String,
    pub population: u64,
}

#[derive(Debug, Serialize)]
pub struct CityListResponse {
    pub total: usize,
    pub cities: Vec<CityRecord>,
}

// ==================
// City Routes
// ==================

/// Create city routes
pub fn city_routes(state: AppState) -> Router {
    Router::new()
        .route("/city", post(upsert_city).put(upsert_city))
        .route("/city/:name", get(get_city))
        .route("/cities", get(list_cities))
        .with_state(state)
}

/// Insert or overwrite a city and its population
async fn upsert_city(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<UpsertResponse>> {
    let input = UpsertInput::from_body(&body)?;

    let store = state
        .connections
        .ensure_connected()
        .await
        .map_err(|e| ApiError::store("Error upserting city", e))?;

    let key = input.key();
    let record = input.into_record();
    let outcome = store
        .put(state.index(), &key, &record)
        .await
        .map_err(|e| ApiError::store("Error upserting city", e))?;

    Ok(Json(UpsertResponse {
        message: format!("City '{}' {} successfully", record.city, outcome),
        city: record.city,
        population: record.population,
    }))
}

/// Fetch one city by name, any casing
async fn get_city(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<CityRecord>> {
    let key = normalize_key(&name);
    if key.is_empty() {
        return Err(ApiError::CityNotFound(name));
    }

    let store = state
        .connections
        .ensure_connected()
        .await
        .map_err(|e| ApiError::store("Error retrieving city", e))?;

    match store.get(state.index(), &key).await {
        Ok(record) => Ok(Json(record)),
        Err(e) if e.is_not_found() => Err(ApiError::CityNotFound(name)),
        Err(e) => Err(ApiError::store("Error retrieving city", e)),
    }
}

/// List stored cities in backend order
async fn list_cities(State(state): State<AppState>) -> ApiResult<Json<CityListResponse>> {
    let store = state
        .connections
        .ensure_connected()
        .await
        .map_err(|e| ApiError::store("Error listing cities", e))?;

    let cities = store
        .search_all(state.index(), MAX_LISTED_CITIES)
        .await
        .map_err(|e| ApiError::store("Error listing cities", e))?;

    Ok(Json(CityListResponse {
        total: cities.len(),
        cities,
    }))
}
