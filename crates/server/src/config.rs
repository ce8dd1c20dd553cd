//! Server configuration

use crate::error::{Result, ServerError};
use std::net::SocketAddr;

/// Default HTTP port of the dashboard API
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// HTTP bind configuration
///
/// # Example
///
/// ```
/// use server::config::ServerConfig;
///
/// let config = ServerConfig::new("127.0.0.1", 8000);
/// assert_eq!(config.http_addr().unwrap().port(), 8000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// HTTP port, 0 for an ephemeral port
    pub http_port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, http_port: u16) -> Self {
        Self {
            host: host.into(),
            http_port,
        }
    }

    /// Parsed HTTP socket address
    pub fn http_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.http_port)
            .parse()
            .map_err(|_| ServerError::InvalidAddress(format!("{}:{}", self.host, self.http_port)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_HTTP_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.http_port, 8000);
    }

    #[test]
    fn test_http_addr() {
        let addr = ServerConfig::new("127.0.0.1", 8123).http_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8123");
    }

    #[test]
    fn test_invalid_host() {
        let result = ServerConfig::new("not a host", 8000).http_addr();
        assert_matches!(result, Err(ServerError::InvalidAddress(addr)) if addr == "not a host:8000");
    }
}
