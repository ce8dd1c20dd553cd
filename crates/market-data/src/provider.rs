//! Market data provider - trait and implementations

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::MarketDataError;
use crate::types::{MarketSnapshot, OptionQuote};
use crate::Result;

/// Source of spot and option prices - protocol agnostic
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Provider name for logs and health reporting
    fn name(&self) -> &str;

    /// Current spot price of the underlying in quote currency
    async fn spot_price(&self) -> Result<f64>;

    /// Every listed option of the configured family
    async fn option_chain(&self) -> Result<Vec<OptionQuote>>;

    /// A single option ticker
    async fn option_quote(&self, inst_id: &str) -> Result<OptionQuote>;
}

/// Fetch spot and chain in sequence.
///
/// Any failure, or a spot price that is not strictly positive, yields
/// `None`. Callers treat that as "no data this cycle".
pub async fn fetch_snapshot(provider: &dyn MarketDataProvider) -> Option<MarketSnapshot> {
    let spot_price = match provider.spot_price().await {
        Ok(price) if price > 0.0 => price,
        Ok(price) => {
            warn!(provider = provider.name(), price, "Spot price not positive, skipping cycle");
            return None;
        }
        Err(e) => {
            warn!(provider = provider.name(), kind = e.kind(), error = %e, "Failed to fetch spot price");
            return None;
        }
    };

    let quotes = match provider.option_chain().await {
        Ok(quotes) if !quotes.is_empty() => quotes,
        Ok(_) => {
            warn!(provider = provider.name(), "Option chain is empty");
            return None;
        }
        Err(e) => {
            warn!(provider = provider.name(), kind = e.kind(), error = %e, "Failed to fetch option chain");
            return None;
        }
    };

    debug!(
        provider = provider.name(),
        spot_price,
        quotes = quotes.len(),
        "Fetched market snapshot"
    );

    Some(MarketSnapshot::new(spot_price, quotes))
}

// ==================== Static Implementation ====================

/// Fixed prices, for offline runs and tests
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    spot: Option<f64>,
    quotes: Vec<OptionQuote>,
}

impl StaticProvider {
    /// Create a provider serving the given spot and chain
    pub fn new(spot: f64, quotes: Vec<OptionQuote>) -> Self {
        Self {
            spot: Some(spot),
            quotes,
        }
    }

    /// Provider whose spot request always fails
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Add a quote to the chain
    pub fn with_quote(mut self, quote: OptionQuote) -> Self {
        self.quotes.push(quote);
        self
    }
}

#[async_trait]
impl MarketDataProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn spot_price(&self) -> Result<f64> {
        self.spot
            .ok_or_else(|| MarketDataError::DataNotAvailable("spot price".to_string()))
    }

    async fn option_chain(&self) -> Result<Vec<OptionQuote>> {
        Ok(self.quotes.clone())
    }

    async fn option_quote(&self, inst_id: &str) -> Result<OptionQuote> {
        self.quotes
            .iter()
            .find(|q| q.inst_id == inst_id)
            .cloned()
            .ok_or_else(|| MarketDataError::DataNotAvailable(inst_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn quote(id: &str) -> OptionQuote {
        OptionQuote::new(id, Some(0.05), Some(0.04))
    }

    #[tokio::test]
    async fn test_fetch_snapshot() {
        let provider = StaticProvider::new(65000.0, vec![quote("BTC-USD-250328-60000-C")]);

        let snapshot = fetch_snapshot(&provider).await.unwrap();
        assert_eq!(snapshot.spot_price, 65000.0);
        assert_eq!(snapshot.quotes.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_snapshot_without_spot() {
        let provider = StaticProvider::unavailable().with_quote(quote("BTC-USD-250328-60000-C"));
        assert!(fetch_snapshot(&provider).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_snapshot_zero_spot() {
        let provider = StaticProvider::new(0.0, vec![quote("BTC-USD-250328-60000-C")]);
        assert!(fetch_snapshot(&provider).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_snapshot_empty_chain() {
        let provider = StaticProvider::new(65000.0, Vec::new());
        assert!(fetch_snapshot(&provider).await.is_none());
    }

    #[tokio::test]
    async fn test_option_quote_lookup() {
        let provider = StaticProvider::new(65000.0, vec![quote("BTC-USD-250328-60000-C")]);

        let found = provider.option_quote("BTC-USD-250328-60000-C").await.unwrap();
        assert_eq!(found.ask, Some(0.05));

        let missing = provider.option_quote("BTC-USD-250328-70000-C").await;
        assert_matches!(missing, Err(MarketDataError::DataNotAvailable(_)));
    }
}
