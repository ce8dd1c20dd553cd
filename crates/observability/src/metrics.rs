//! Prometheus metrics infrastructure
//!
//! This module provides the Prometheus exporter and the metric set recorded
//! by every arbitrage scan.

use metrics::{counter, gauge, histogram, Counter, Gauge, Histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Initialize the Prometheus metrics exporter
///
/// This starts an HTTP server on the specified port that exposes metrics
/// at the `/metrics` endpoint.
///
/// # Arguments
///
/// * `port` - Port to expose metrics on
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Metrics recorded per scan of the option chain
///
/// # Metrics
///
/// * `arb_scans_total` - Scans attempted
/// * `arb_scan_no_data_total` - Scans skipped because market data was unavailable
/// * `arb_scan_duration_seconds` - Scan duration histogram
/// * `arb_quotes` - Quotes in the last snapshot
/// * `arb_pairs` - Call/put pairs matched in the last snapshot
/// * `arb_opportunities` - Opportunities accepted in the last scan
/// * `arb_spot_price` - Last spot price
///
/// All metrics carry a `provider` label.
#[derive(Clone)]
pub struct ScanMetrics {
    scans_total: Counter,
    no_data_total: Counter,
    scan_duration: Histogram,
    quotes: Gauge,
    pairs: Gauge,
    opportunities: Gauge,
    spot_price: Gauge,
    provider: String,
}

impl ScanMetrics {
    /// Create metrics for a specific market data provider
    pub fn new(provider: &str) -> Self {
        let name = provider.to_string();

        Self {
            scans_total: counter!("arb_scans_total", "provider" => name.clone()),
            no_data_total: counter!("arb_scan_no_data_total", "provider" => name.clone()),
            scan_duration: histogram!("arb_scan_duration_seconds", "provider" => name.clone()),
            quotes: gauge!("arb_quotes", "provider" => name.clone()),
            pairs: gauge!("arb_pairs", "provider" => name.clone()),
            opportunities: gauge!("arb_opportunities", "provider" => name.clone()),
            spot_price: gauge!("arb_spot_price", "provider" => name.clone()),
            provider: name,
        }
    }

    /// Record a scan that produced a snapshot
    pub fn record_scan(&self, spot_price: f64, quotes: usize, pairs: usize, opportunities: usize) {
        self.scans_total.increment(1);
        self.spot_price.set(spot_price);
        self.quotes.set(quotes as f64);
        self.pairs.set(pairs as f64);
        self.opportunities.set(opportunities as f64);
    }

    /// Record a scan that found no market data
    pub fn record_no_data(&self) {
        self.scans_total.increment(1);
        self.no_data_total.increment(1);
        self.opportunities.set(0.0);
    }

    pub fn record_duration(&self, duration: Duration) {
        self.scan_duration.record(duration.as_secs_f64());
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }
}

/// Records scan duration when dropped
pub struct ScanTimer<'a> {
    metrics: &'a ScanMetrics,
    start: Instant,
}

impl<'a> ScanTimer<'a> {
    pub fn new(metrics: &'a ScanMetrics) -> Self {
        Self {
            metrics,
            start: Instant::now(),
        }
    }
}

impl Drop for ScanTimer<'_> {
    fn drop(&mut self) {
        self.metrics.record_duration(self.start.elapsed());
    }
}
