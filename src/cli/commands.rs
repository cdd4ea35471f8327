//! Service startup
//!
//! Boot order: logging, configuration, store connection (best effort),
//! then the HTTP listener. A store that is down at boot does not stop the
//! service; requests reconnect on demand.

use std::sync::Arc;

use crate::http_server::{AppState, HttpServer};
use crate::observability::{init_logging, log_event, Event};
use crate::store::{
    ConnectionManager, ElasticsearchConnector, IndexSchema, MemoryConnector, MemoryStore,
    StoreConnector,
};

use super::args::{Backend, Cli, ServiceConfig};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the service until shutdown
pub async fn run() -> CliResult<()> {
    let config = Cli::parse_args().into_config();
    init_logging(&config.logging);
    serve(config).await
}

/// Connector for the configured backend
pub fn connector_for(config: &ServiceConfig) -> Arc<dyn StoreConnector> {
    match config.backend {
        Backend::Elasticsearch => Arc::new(ElasticsearchConnector::new(config.store.clone())),
        Backend::Memory => Arc::new(MemoryConnector::new(Arc::new(MemoryStore::new()))),
    }
}

/// Build the application state and serve HTTP
pub async fn serve(config: ServiceConfig) -> CliResult<()> {
    log_event!(Event::BootStart);

    let target = match config.backend {
        Backend::Elasticsearch => config.store.target(),
        Backend::Memory => "memory".to_string(),
    };
    let listen = config.http.socket_addr();
    log_event!(Event::ConfigLoaded, listen = %listen, store = %target);

    let connections = Arc::new(ConnectionManager::new(
        connector_for(&config),
        config.retry,
        IndexSchema::cities(),
    ));
    connections.initialize().await;

    let server = HttpServer::with_config(config.http, AppState::new(connections));
    server
        .start()
        .await
        .map_err(|e| CliError::serve_failed(format!("{} ({})", e, listen)))
}
