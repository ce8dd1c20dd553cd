//! Arbitrage scanner
//!
//! Ties the pipeline together: fetch a snapshot, pair the chain, evaluate
//! each quotable pair and collect the survivors.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use market_data::{fetch_snapshot, MarketDataProvider, MarketSnapshot, OptionQuote};
use observability::{ScanMetrics, ScanTimer};
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::evaluator::ArbitrageEvaluator;
use crate::expiry::DEFAULT_SETTLEMENT_HOUR;
use crate::pairing::pair_options;
use crate::types::{ArbitrageOpportunity, ScanReport, ScanStats};

/// Evaluate a snapshot at `now`.
///
/// Pure apart from logging: pairs the chain, drops pairs with a missing
/// bid or ask and keeps what clears the evaluator's threshold.
pub fn evaluate_snapshot<Tz: TimeZone>(
    snapshot: MarketSnapshot,
    evaluator: &ArbitrageEvaluator,
    now: &DateTime<Tz>,
) -> ScanReport {
    let spot = snapshot.spot_price;
    let mut stats = ScanStats {
        quotes: snapshot.quotes.len(),
        ..ScanStats::default()
    };

    let pairs = pair_options(snapshot.quotes);
    stats.pairs = pairs.len();

    let opportunities: Vec<_> = pairs
        .iter()
        .filter(|pair| pair.is_quotable())
        .inspect(|_| stats.quotable_pairs += 1)
        .filter_map(|pair| evaluator.evaluate_at(pair, spot, now))
        .collect();
    stats.accepted = opportunities.len();

    ScanReport {
        spot_price: spot,
        min_annual_rate: evaluator.min_annual_rate(),
        opportunities,
        stats,
        data_available: true,
        scanned_at: Utc::now(),
    }
}

/// Fetches market data and runs the evaluation pipeline
pub struct ArbitrageScanner {
    provider: Arc<dyn MarketDataProvider>,
    settlement_hour: u32,
    metrics: ScanMetrics,
}

impl ArbitrageScanner {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        let metrics = ScanMetrics::new(provider.name());
        Self {
            provider,
            settlement_hour: DEFAULT_SETTLEMENT_HOUR,
            metrics,
        }
    }

    pub fn with_settlement_hour(mut self, hour: u32) -> Self {
        self.settlement_hour = hour;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Scan the current market at `min_annual_rate`.
    ///
    /// Never fails: when market data is unavailable the report is empty
    /// and `data_available` is false.
    #[instrument(skip(self), fields(provider = %self.provider.name()))]
    pub async fn scan(&self, min_annual_rate: f64) -> ScanReport {
        let _timer = ScanTimer::new(&self.metrics);

        let Some(snapshot) = fetch_snapshot(self.provider.as_ref()).await else {
            warn!("No market data, returning empty scan");
            self.metrics.record_no_data();
            return ScanReport::empty(min_annual_rate);
        };

        let evaluator =
            ArbitrageEvaluator::new(min_annual_rate).with_settlement_hour(self.settlement_hour);
        let report = evaluate_snapshot(snapshot, &evaluator, &Local::now());

        self.metrics.record_scan(
            report.spot_price,
            report.stats.quotes,
            report.stats.pairs,
            report.stats.accepted,
        );

        let best_rate = report
            .opportunities
            .iter()
            .map(ArbitrageOpportunity::best_annual_rate)
            .fold(f64::NAN, f64::max);

        info!(
            spot = report.spot_price,
            best_rate,
            quotes = report.stats.quotes,
            pairs = report.stats.pairs,
            quotable = report.stats.quotable_pairs,
            accepted = report.stats.accepted,
            "Scan complete"
        );

        report
    }

    pub fn settlement_hour(&self) -> u32 {
        self.settlement_hour
    }

    /// Current quote for one option
    pub async fn fetch_option(&self, inst_id: &str) -> Result<OptionQuote> {
        Ok(self.provider.option_quote(inst_id).await?)
    }

    /// Current spot price
    pub async fn spot_price(&self) -> Result<f64> {
        Ok(self.provider.spot_price().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArbitrageError;
    use assert_matches::assert_matches;
    use chrono::Duration;
    use market_data::StaticProvider;

    fn chain(expiry: &str) -> Vec<OptionQuote> {
        let id = |strike: u32, tag: &str| format!("BTC-USD-{}-{}-{}", expiry, strike, tag);
        vec![
            // Rich long side: synthetic long 62730 against 65000 spot
            OptionQuote::new(id(60000, "C"), Some(0.05), Some(0.04)),
            OptionQuote::new(id(60000, "P"), Some(0.01), Some(0.008)),
            // Fair pair
            OptionQuote::new(id(65000, "C"), Some(0.051), Some(0.049)),
            OptionQuote::new(id(65000, "P"), Some(0.051), Some(0.049)),
            // Missing ask
            OptionQuote::new(id(70000, "C"), None, Some(0.02)),
            OptionQuote::new(id(70000, "P"), Some(0.1), Some(0.09)),
            // Trailing single
            OptionQuote::new(id(75000, "C"), Some(0.01), Some(0.009)),
        ]
    }

    /// Expiry a month from now, as `YYMMDD`
    fn next_month() -> String {
        (Local::now() + Duration::days(30)).format("%y%m%d").to_string()
    }

    #[test]
    fn test_evaluate_snapshot_stats() {
        let settlement = Utc.with_ymd_and_hms(2099, 12, 31, 16, 0, 0).unwrap();
        let now = settlement - Duration::days(30);
        let evaluator = ArbitrageEvaluator::new(0.05);

        let report = evaluate_snapshot(MarketSnapshot::new(65000.0, chain("991231")), &evaluator, &now);

        assert!(report.data_available);
        assert_eq!(report.stats.quotes, 7);
        assert_eq!(report.stats.pairs, 3);
        assert_eq!(report.stats.quotable_pairs, 2);
        assert_eq!(report.stats.accepted, 1);
        assert_eq!(report.opportunities[0].strike_price, 60000.0);
        assert_eq!(report.opportunities[0].expiry_date, "20991231");
    }

    #[tokio::test]
    async fn test_scan_with_static_provider() {
        let scanner =
            ArbitrageScanner::new(Arc::new(StaticProvider::new(65000.0, chain(&next_month()))));
        assert_eq!(scanner.provider_name(), "static");

        let report = scanner.scan(0.05).await;
        assert_eq!(report.spot_price, 65000.0);
        assert_eq!(report.min_annual_rate, 0.05);
        assert_eq!(report.stats.accepted, 1);
    }

    #[tokio::test]
    async fn test_scan_without_data() {
        let scanner = ArbitrageScanner::new(Arc::new(StaticProvider::unavailable()));

        let report = scanner.scan(0.05).await;
        assert!(!report.data_available);
        assert_eq!(report.spot_price, 0.0);
        assert!(report.opportunities.is_empty());
    }

    #[tokio::test]
    async fn test_scan_empty_chain() {
        let scanner = ArbitrageScanner::new(Arc::new(StaticProvider::new(65000.0, Vec::new())));
        assert!(scanner.scan(0.05).await.opportunities.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_option() {
        let scanner = ArbitrageScanner::new(Arc::new(StaticProvider::new(65000.0, chain("991231"))));

        let quote = scanner.fetch_option("BTC-USD-991231-60000-P").await.unwrap();
        assert_eq!(quote.bid, Some(0.008));

        assert_matches!(
            scanner.fetch_option("BTC-USD-991231-1-P").await,
            Err(ArbitrageError::MarketData(_))
        );
    }
}
