//! Document store configuration
//!
//! Where the Elasticsearch cluster lives and how patiently to talk to it.

use std::time::Duration;

/// Elasticsearch connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl StoreConfig {
    /// `host:port`, as shown in logs
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Root URL of the cluster's REST API
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
