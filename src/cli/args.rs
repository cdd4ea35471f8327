//! CLI argument definitions using clap
//!
//! There are no subcommands; every setting can come from a flag or from
//! the environment variable named next to it.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::http_server::HttpServerConfig;
use crate::observability::{LogFormat, LoggingConfig, Severity};
use crate::store::{RetryPolicy, StoreConfig};

/// citypop - store and query city populations over HTTP
#[derive(Parser, Debug)]
#[command(name = "citypop")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address the HTTP server binds to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the HTTP server listens on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Elasticsearch host
    #[arg(long, env = "ELASTICSEARCH_HOST", default_value = "localhost")]
    pub es_host: String,

    /// Elasticsearch port
    #[arg(long, env = "ELASTICSEARCH_PORT", default_value_t = 9200)]
    pub es_port: u16,

    /// Per-request timeout for Elasticsearch calls, in seconds
    #[arg(long, env = "ELASTICSEARCH_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Connection attempts before giving up
    #[arg(long, env = "CONNECT_ATTEMPTS", default_value_t = 5)]
    pub connect_attempts: u32,

    /// Delay between connection attempts, in seconds
    #[arg(long, env = "CONNECT_DELAY_SECS", default_value_t = 5)]
    pub connect_delay_secs: u64,

    /// Document store backend
    #[arg(long, env = "CITYPOP_BACKEND", value_enum, default_value_t = Backend::Elasticsearch)]
    pub backend: Backend,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Minimum log level
    #[arg(long, env = "LOG_LEVEL", value_enum, default_value_t = Severity::Info)]
    pub log_level: Severity,
}

/// Which document store implementation to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Remote Elasticsearch cluster
    Elasticsearch,
    /// Process-local store, lost on exit
    Memory,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub http: HttpServerConfig,
    pub store: StoreConfig,
    pub retry: RetryPolicy,
    pub backend: Backend,
    pub logging: LoggingConfig,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn into_config(self) -> ServiceConfig {
        ServiceConfig {
            http: HttpServerConfig {
                host: self.host,
                port: self.port,
            },
            store: StoreConfig {
                host: self.es_host,
                port: self.es_port,
                timeout_secs: self.request_timeout_secs,
            },
            retry: RetryPolicy::new(
                self.connect_attempts,
                Duration::from_secs(self.connect_delay_secs),
            ),
            backend: self.backend,
            logging: LoggingConfig {
                format: self.log_format,
                level: self.log_level,
            },
        }
    }
}
