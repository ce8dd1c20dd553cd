//! Market data error types

use thiserror::Error;

/// Errors that can occur while fetching market data
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// Transport-level failure (DNS, TLS, timeout, ...)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Non-success HTTP status from the provider
    #[error("HTTP {status} from provider: {body}")]
    Http { status: u16, body: String },

    /// Provider answered with an error envelope
    #[error("Provider error: {0}")]
    Provider(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Data not available
    #[error("Data not available: {0}")]
    DataNotAvailable(String),
}

impl MarketDataError {
    /// Short label for structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            MarketDataError::Connection(_) => "connection",
            MarketDataError::Http { .. } => "http",
            MarketDataError::Provider(_) => "provider",
            MarketDataError::InvalidResponse(_) => "invalid_response",
            MarketDataError::DataNotAvailable(_) => "not_available",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(MarketDataError::Connection("timeout".into()).kind(), "connection");
        assert_eq!(
            MarketDataError::Http { status: 503, body: String::new() }.kind(),
            "http"
        );
        assert_eq!(MarketDataError::Provider("51001".into()).kind(), "provider");
        assert_eq!(MarketDataError::InvalidResponse("eof".into()).kind(), "invalid_response");
        assert_eq!(MarketDataError::DataNotAvailable("x".into()).kind(), "not_available");
    }
}
