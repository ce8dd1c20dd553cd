//! Background scan loop
//!
//! Rescans on a fixed interval so upstream health and scan metrics stay
//! current even when nobody is looking at the dashboard.

use std::time::Duration;

use server::run_until_shutdown;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::api::ArbitrageApiState;

/// Periodic scanner driven by a cancellation token
pub struct ScanMonitor {
    state: ArbitrageApiState,
    interval: Duration,
}

impl ScanMonitor {
    pub fn new(state: ArbitrageApiState, interval: Duration) -> Self {
        Self { state, interval }
    }

    /// Scan until `token` is cancelled. Returns the number of completed scans.
    pub async fn run(self, token: CancellationToken) -> u64 {
        let min_rate = self.state.default_min_rate;
        let mut scans = 0u64;

        info!(
            interval_secs = self.interval.as_secs_f64(),
            min_rate, "Scan monitor started"
        );

        loop {
            if token.is_cancelled() {
                break;
            }

            let Some(report) =
                run_until_shutdown(token.clone(), self.state.scanner.scan(min_rate)).await
            else {
                break;
            };

            self.state.record_scan_health(&report).await;
            scans += 1;
            debug!(
                scans,
                accepted = report.stats.accepted,
                data_available = report.data_available,
                "Background scan done"
            );

            if run_until_shutdown(token.clone(), tokio::time::sleep(self.interval))
                .await
                .is_none()
            {
                break;
            }
        }

        info!(scans, "Scan monitor stopped");
        scans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ArbitrageScanner;
    use crate::store::memory::InMemoryOpportunityStore;
    use market_data::StaticProvider;
    use server::HealthState;
    use std::sync::Arc;

    fn state(provider: StaticProvider) -> ArbitrageApiState {
        ArbitrageApiState::new(
            Arc::new(ArbitrageScanner::new(Arc::new(provider))),
            Arc::new(InMemoryOpportunityStore::new()),
            Arc::new(HealthState::new("parb")),
            0.05,
        )
    }

    #[tokio::test]
    async fn test_monitor_records_unavailable_upstream() {
        let state = state(StaticProvider::unavailable());
        let health = state.health.clone();
        let token = CancellationToken::new();

        let handle = tokio::spawn(ScanMonitor::new(state, Duration::from_secs(60)).run(token.clone()));

        // First scan runs immediately, then the loop sleeps
        for _ in 0..50 {
            if !health.upstreams().await.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!health.is_healthy().await);

        token.cancel();
        assert_eq!(handle.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_monitor_stops_when_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();

        let scans = ScanMonitor::new(state(StaticProvider::unavailable()), Duration::from_millis(1))
            .run(token)
            .await;
        assert_eq!(scans, 0);
    }
}
