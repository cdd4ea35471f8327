//! Listen address for the API

/// Where the HTTP server binds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

impl HttpServerConfig {
    /// `host:port` for `TcpListener::bind`
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
