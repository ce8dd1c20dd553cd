//! Arbitrage error types

use market_data::MarketDataError;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised at the boundaries of the arbitrage engine.
///
/// The evaluation pipeline itself never fails; these cover market data
/// lookups and the saved-opportunity store.
#[derive(Error, Debug)]
pub enum ArbitrageError {
    /// Market data lookup failed
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    /// Saved opportunity not found
    #[error("Saved opportunity not found: {0}")]
    NotFound(Uuid),

    /// Storage I/O failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored data could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid request
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<std::io::Error> for ArbitrageError {
    fn from(e: std::io::Error) -> Self {
        ArbitrageError::Storage(e.to_string())
    }
}

/// Result type for arbitrage operations
pub type Result<T> = std::result::Result<T, ArbitrageError>;
