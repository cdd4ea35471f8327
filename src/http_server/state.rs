//! Shared handler state

use std::sync::Arc;

use crate::store::ConnectionManager;

/// State handed to every handler.
///
/// Holds no records, only the way to reach the store.
#[derive(Clone)]
pub struct AppState {
    pub connections: Arc<ConnectionManager>,
}

impl AppState {
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self { connections }
    }

    /// Index all city documents live in
    pub fn index(&self) -> &str {
        &self.connections.schema().name
    }
}
