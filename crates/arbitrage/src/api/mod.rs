//! HTTP API for the arbitrage monitor
//!
//! JSON endpoints for the current opportunities, the saved set, and the
//! background scan monitor that keeps upstream health current.

pub mod handlers;
pub mod models;
pub mod monitor;
pub mod routes;

use std::sync::Arc;

use server::{HealthState, UpstreamStatus};

use crate::scanner::ArbitrageScanner;
use crate::store::traits::OpportunityStore;
use crate::types::ScanReport;

pub use monitor::ScanMonitor;
pub use routes::create_router;

/// Shared state of the API handlers
#[derive(Clone)]
pub struct ArbitrageApiState {
    pub scanner: Arc<ArbitrageScanner>,
    pub store: Arc<dyn OpportunityStore>,
    pub health: Arc<HealthState>,
    /// Threshold used when a request does not pass `min_rate`
    pub default_min_rate: f64,
    /// Upstream endpoint reported by the health check
    pub upstream_endpoint: String,
}

impl ArbitrageApiState {
    pub fn new(
        scanner: Arc<ArbitrageScanner>,
        store: Arc<dyn OpportunityStore>,
        health: Arc<HealthState>,
        default_min_rate: f64,
    ) -> Self {
        Self {
            scanner,
            store,
            health,
            default_min_rate,
            upstream_endpoint: String::new(),
        }
    }

    pub fn with_upstream_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.upstream_endpoint = endpoint.into();
        self
    }

    /// Record whether the scan found market data
    pub async fn record_scan_health(&self, report: &ScanReport) {
        let provider = self.scanner.provider_name();
        let status = if report.data_available {
            UpstreamStatus::available(provider, &self.upstream_endpoint)
        } else {
            UpstreamStatus::unavailable(provider, &self.upstream_endpoint, "no market data")
        };
        self.health.record_upstream(status).await;
    }
}
