//! HTTP API Tests
//!
//! Drives the full router against the in-memory store:
//! - upsert validation and created/updated reporting
//! - case-insensitive lookup
//! - listing
//! - health before and after an outage
//! - reconnects, listing cap and handler panics
//! - error bodies for unknown routes

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use citypop::city::{CityRecord, WriteOutcome};
use citypop::http_server::city_routes::MAX_LISTED_CITIES;
use citypop::http_server::{build_router, AppState};
use citypop::store::{
    ConnectionManager, DocumentStore, IndexSchema, MemoryConnector, MemoryStore, RetryPolicy,
    StoreConnector, StoreHandle, StoreResult,
};

// =============================================================================
// Helper Functions
// =============================================================================

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    connections: Arc<ConnectionManager>,
}

fn manager(store: &Arc<MemoryStore>) -> Arc<ConnectionManager> {
    Arc::new(ConnectionManager::new(
        Arc::new(MemoryConnector::new(store.clone())),
        RetryPolicy::immediate(2),
        IndexSchema::cities(),
    ))
}

async fn setup_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let connections = manager(&store);
    assert!(connections.initialize().await);
    TestApp {
        router: build_router(AppState::new(connections.clone())),
        store,
        connections,
    }
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    send_request(router, builder.body(body).unwrap()).await
}

async fn send_request(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn upsert(router: &Router, city: &str, population: Value) -> (StatusCode, Value) {
    send(
        router,
        "POST",
        "/city",
        Some(json!({"city": city, "population": population})),
    )
    .await
}

// =============================================================================
// Session-Tracking Backend
// =============================================================================

/// Backend state shared by every session. `wipe` swaps in an empty store,
/// like a node restarting without its data.
#[derive(Debug, Default)]
struct Cluster {
    store: Mutex<Arc<MemoryStore>>,
    search_limits: Mutex<Vec<usize>>,
    panic_on_search: AtomicBool,
}

impl Cluster {
    fn store(&self) -> Arc<MemoryStore> {
        self.store.lock().unwrap().clone()
    }

    fn wipe(&self) {
        *self.store.lock().unwrap() = Arc::new(MemoryStore::new());
    }
}

/// One client connection. Once closed its pings fail, so the manager has
/// to reconnect.
#[derive(Debug)]
struct Session {
    cluster: Arc<Cluster>,
    closed: AtomicBool,
}

#[async_trait]
impl DocumentStore for Session {
    async fn ping(&self) -> StoreResult<bool> {
        if self.closed.load(Ordering::SeqCst) {
            return Ok(false);
        }
        self.cluster.store().ping().await
    }

    async fn index_exists(&self, index: &str) -> StoreResult<bool> {
        self.cluster.store().index_exists(index).await
    }

    async fn create_index(&self, schema: &IndexSchema) -> StoreResult<()> {
        self.cluster.store().create_index(schema).await
    }

    async fn put(&self, index: &str, id: &str, record: &CityRecord) -> StoreResult<WriteOutcome> {
        self.cluster.store().put(index, id, record).await
    }

    async fn get(&self, index: &str, id: &str) -> StoreResult<CityRecord> {
        self.cluster.store().get(index, id).await
    }

    async fn search_all(&self, index: &str, limit: usize) -> StoreResult<Vec<CityRecord>> {
        self.cluster.search_limits.lock().unwrap().push(limit);
        if self.cluster.panic_on_search.load(Ordering::SeqCst) {
            panic!("search blew up");
        }
        self.cluster.store().search_all(index, limit).await
    }
}

#[derive(Debug)]
struct SessionConnector {
    cluster: Arc<Cluster>,
    sessions: Mutex<Vec<Arc<Session>>>,
}

impl SessionConnector {
    fn close_all(&self) {
        for session in self.sessions.lock().unwrap().iter() {
            session.closed.store(true, Ordering::SeqCst);
        }
    }

    fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

#[async_trait]
impl StoreConnector for SessionConnector {
    async fn connect(&self) -> StoreResult<StoreHandle> {
        let session = Arc::new(Session {
            cluster: self.cluster.clone(),
            closed: AtomicBool::new(false),
        });
        self.sessions.lock().unwrap().push(session.clone());
        let handle: StoreHandle = session;
        Ok(handle)
    }

    fn describe(&self) -> String {
        "sessions".to_string()
    }
}

struct SessionApp {
    router: Router,
    cluster: Arc<Cluster>,
    connector: Arc<SessionConnector>,
}

async fn setup_session_app() -> SessionApp {
    let cluster = Arc::new(Cluster::default());
    let connector = Arc::new(SessionConnector {
        cluster: cluster.clone(),
        sessions: Mutex::new(Vec::new()),
    });
    let connections = Arc::new(ConnectionManager::new(
        connector.clone(),
        RetryPolicy::immediate(2),
        IndexSchema::cities(),
    ));
    assert!(connections.initialize().await);
    SessionApp {
        router: build_router(AppState::new(connections)),
        cluster,
        connector,
    }
}

// =============================================================================
// Upsert Tests
// =============================================================================

#[tokio::test]
async fn test_upsert_reports_created_then_updated() {
    let app = setup_app().await;

    let (status, body) = upsert(&app.router, "Paris", json!(2_148_000)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "message": "City 'Paris' created successfully",
            "city": "Paris",
            "population": 2148000
        })
    );

    let (status, body) = upsert(&app.router, "Paris", json!(2_148_000)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "City 'Paris' updated successfully");
}

#[tokio::test]
async fn test_put_is_an_upsert_too() {
    let app = setup_app().await;

    let (status, body) = send(
        &app.router,
        "PUT",
        "/city",
        Some(json!({"city": "Lyon", "population": 513_000})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "City 'Lyon' created successfully");
}

#[tokio::test]
async fn test_upsert_trims_city_name() {
    let app = setup_app().await;

    let (status, body) = upsert(&app.router, " Paris ", json!(1)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "Paris");

    let (_, body) = send(&app.router, "GET", "/city/paris", None).await;
    assert_eq!(body, json!({"city": "Paris", "population": 1}));
}

#[tokio::test]
async fn test_upsert_validation_errors() {
    let app = setup_app().await;

    let cases = [
        (json!({"city": "Rome"}), "Invalid input. Required fields: 'city' and 'population'"),
        (json!({"population": 5}), "Invalid input. Required fields: 'city' and 'population'"),
        (json!({"city": "   ", "population": 5}), "City name cannot be empty"),
        (json!({"city": "Rome", "population": "abc"}), "Population must be a valid integer"),
        (json!({"city": "Rome", "population": null}), "Population must be a valid integer"),
        (json!({"city": "Rome", "population": -1}), "Population must be non-negative"),
    ];

    for (payload, message) in cases {
        let (status, body) = send(&app.router, "POST", "/city", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
        assert_eq!(body, json!({ "error": message }), "payload {}", payload);
    }

    // nothing reached the store
    assert_eq!(app.store.len("cities").await, 0);
}

#[tokio::test]
async fn test_upsert_without_body() {
    let app = setup_app().await;

    let (status, body) = send(&app.router, "POST", "/city", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid input. Required fields: 'city' and 'population'");

    let request = Request::builder()
        .method("POST")
        .uri("/city")
        .header("content-type", "application/json")
        .body(Body::from("{\"city\": "))
        .unwrap();
    let (status, _) = send_request(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upsert_accepts_zero_and_large_populations() {
    let app = setup_app().await;

    let (status, body) = upsert(&app.router, "Ghost Town", json!(0)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["population"], 0);

    let (status, body) = upsert(&app.router, "Megacity", json!(37_400_000_000_i64)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["population"], 37_400_000_000_i64);

    let (status, body) = upsert(&app.router, "Textville", json!("1200")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["population"], 1200);
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[tokio::test]
async fn test_lookup_is_case_insensitive_and_last_write_wins() {
    let app = setup_app().await;

    upsert(&app.router, "Paris", json!(100)).await;
    upsert(&app.router, "PARIS", json!(200)).await;

    for uri in ["/city/paris", "/city/Paris", "/city/PaRiS"] {
        let (status, body) = send(&app.router, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"city": "PARIS", "population": 200}));
    }
    assert_eq!(app.store.len("cities").await, 1);
}

#[tokio::test]
async fn test_lookup_percent_encoded_name() {
    let app = setup_app().await;
    upsert(&app.router, "New York", json!(8_336_000)).await;

    let (status, body) = send(&app.router, "GET", "/city/new%20york", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "New York");
}

#[tokio::test]
async fn test_lookup_miss_names_the_city() {
    let app = setup_app().await;

    let (status, body) = send(&app.router, "GET", "/city/Atlantis", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "City 'Atlantis' not found"}));
}

// =============================================================================
// Listing Tests
// =============================================================================

#[tokio::test]
async fn test_list_returns_last_written_state() {
    let app = setup_app().await;

    upsert(&app.router, "Oslo", json!(700_000)).await;
    upsert(&app.router, "Bergen", json!(285_000)).await;
    upsert(&app.router, "oslo", json!(709_000)).await;

    let (status, body) = send(&app.router, "GET", "/cities", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);

    let mut cities = body["cities"].as_array().unwrap().clone();
    cities.sort_by_key(|c| c["city"].as_str().unwrap().to_lowercase());
    assert_eq!(
        cities,
        vec![
            json!({"city": "Bergen", "population": 285000}),
            json!({"city": "oslo", "population": 709000}),
        ]
    );
}

#[tokio::test]
async fn test_list_empty() {
    let app = setup_app().await;

    let (status, body) = send(&app.router, "GET", "/cities", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"total": 0, "cities": []}));
}

// =============================================================================
// Health and Connectivity Tests
// =============================================================================

#[tokio::test]
async fn test_health_follows_backend_reachability() {
    let app = setup_app().await;

    let (status, body) = send(&app.router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "OK", "elasticsearch": "connected"}));

    app.store.set_reachable(false);
    let (status, body) = send(&app.router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"status": "ERROR", "elasticsearch": "disconnected"}));
}

#[tokio::test]
async fn test_health_without_startup_connection() {
    let store = Arc::new(MemoryStore::new());
    store.set_reachable(false);
    let connections = manager(&store);
    assert!(!connections.initialize().await);
    let router = build_router(AppState::new(connections));

    let (status, body) = send(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["elasticsearch"], "disconnected");
}

#[tokio::test]
async fn test_outage_yields_generic_500() {
    let app = setup_app().await;
    upsert(&app.router, "Paris", json!(1)).await;
    app.store.set_reachable(false);

    let (status, body) = upsert(&app.router, "Rome", json!(2)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));

    let (status, body) = send(&app.router, "GET", "/city/paris", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));

    let (status, _) = send(&app.router, "GET", "/cities", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_requests_reconnect_after_startup_failure() {
    let store = Arc::new(MemoryStore::new());
    store.set_reachable(false);
    let connections = manager(&store);
    assert!(!connections.initialize().await);
    let router = build_router(AppState::new(connections.clone()));

    store.set_reachable(true);
    let (status, _) = upsert(&router, "Madrid", json!(3_223_000)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(connections.current().await.is_some());

    let (status, _) = send(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_listing_recovers_after_outage() {
    let app = setup_app().await;
    app.store.set_reachable(false);
    let (status, _) = send(&app.router, "GET", "/cities", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    app.store.set_reachable(true);
    let (status, body) = send(&app.router, "GET", "/cities", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert!(app.connections.current().await.is_some());
}

#[tokio::test]
async fn test_reconnect_recreates_wiped_index() {
    let app = setup_session_app().await;
    upsert(&app.router, "Paris", json!(1)).await;
    assert_eq!(app.connector.session_count(), 1);

    app.cluster.wipe();
    app.connector.close_all();

    // A missing index would make the search fail with 500
    let (status, body) = send(&app.router, "GET", "/cities", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"total": 0, "cities": []}));
    assert_eq!(app.connector.session_count(), 2);
    assert!(app.cluster.store().index_exists("cities").await.unwrap());

    let (status, _) = send(&app.router, "GET", "/city/paris", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_live_session_is_reused() {
    let app = setup_session_app().await;
    upsert(&app.router, "Paris", json!(1)).await;
    send(&app.router, "GET", "/city/paris", None).await;
    send(&app.router, "GET", "/cities", None).await;
    assert_eq!(app.connector.session_count(), 1);
}

#[tokio::test]
async fn test_listing_asks_for_capped_page() {
    let app = setup_session_app().await;
    upsert(&app.router, "Paris", json!(1)).await;

    let (status, body) = send(&app.router, "GET", "/cities", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(
        *app.cluster.search_limits.lock().unwrap(),
        vec![MAX_LISTED_CITIES]
    );
}

// =============================================================================
// Routing Tests
// =============================================================================

#[tokio::test]
async fn test_unknown_route() {
    let app = setup_app().await;

    let (status, body) = send(&app.router, "GET", "/countries", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Endpoint not found"}));
}

#[tokio::test]
async fn test_handler_panic_yields_generic_500() {
    let app = setup_session_app().await;
    app.cluster.panic_on_search.store(true, Ordering::SeqCst);

    let (status, body) = send(&app.router, "GET", "/cities", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));

    // The service keeps answering afterwards
    app.cluster.panic_on_search.store(false, Ordering::SeqCst);
    let (status, _) = send(&app.router, "GET", "/cities", None).await;
    assert_eq!(status, StatusCode::OK);
}
