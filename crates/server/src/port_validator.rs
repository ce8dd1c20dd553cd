//! Port validation utilities
//!
//! Checking a port before binding is racy: another process can take it in
//! between. The check only gives early feedback; the bind is authoritative.

use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// Check that the configured HTTP port can be bound
pub async fn validate_port_available(config: &ServerConfig) -> Result<()> {
    if config.http_port == 0 {
        debug!("Ephemeral port configured, skipping availability check");
        return Ok(());
    }

    let addr = format!("{}:{}", config.host, config.http_port);
    match TcpListener::bind(&addr).await {
        Ok(listener) => {
            let local_addr = listener
                .local_addr()
                .map_err(|e| ServerError::bind(addr.clone(), e))?;
            drop(listener);

            info!(%local_addr, "HTTP port is available");
            Ok(())
        }
        Err(e) => {
            error!(port = config.http_port, error = %e, "HTTP port is NOT available");
            Err(ServerError::port_in_use(config.http_port, e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_port_in_use_detected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let config = ServerConfig::new("127.0.0.1", port);
        assert!(matches!(
            validate_port_available(&config).await,
            Err(ServerError::PortInUse { port: p, .. }) if p == port
        ));

        drop(listener);
        assert!(validate_port_available(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_ephemeral_port_skips_check() {
        let config = ServerConfig::new("127.0.0.1", 0);
        assert!(validate_port_available(&config).await.is_ok());
    }
}
