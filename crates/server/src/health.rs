//! Health check endpoints
//!
//! `/health` is a liveness probe. `/health/detailed` also reports the last
//! known state of each upstream (the market data provider) and answers 503
//! when one of them is down.

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Last observed state of an upstream dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamStatus {
    pub name: String,
    pub endpoint: String,
    pub available: bool,
    pub last_checked: DateTime<Utc>,
    pub error: Option<String>,
}

impl UpstreamStatus {
    pub fn available(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            available: true,
            last_checked: Utc::now(),
            error: None,
        }
    }

    pub fn unavailable(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            available: false,
            last_checked: Utc::now(),
            error: Some(error.into()),
        }
    }
}

/// Shared state for health checks, used as `Arc<HealthState>`
pub struct HealthState {
    pub service_name: String,
    pub start_time: Instant,
    upstreams: RwLock<Vec<UpstreamStatus>>,
}

impl HealthState {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            start_time: Instant::now(),
            upstreams: RwLock::new(Vec::new()),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Record the latest status of an upstream, replacing any previous entry
    pub async fn record_upstream(&self, status: UpstreamStatus) {
        let mut upstreams = self.upstreams.write().await;
        upstreams.retain(|u| u.name != status.name);
        upstreams.push(status);
    }

    pub async fn upstreams(&self) -> Vec<UpstreamStatus> {
        self.upstreams.read().await.clone()
    }

    /// True when every known upstream is available
    pub async fn is_healthy(&self) -> bool {
        self.upstreams.read().await.iter().all(|u| u.available)
    }
}

/// Liveness handler
pub async fn health_handler(State(state): State<Arc<HealthState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": state.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
    }))
}

/// Health including upstream state
pub async fn detailed_health_handler(
    State(state): State<Arc<HealthState>>,
) -> (StatusCode, Json<Value>) {
    let upstreams = state.upstreams().await;
    let all_healthy = upstreams.iter().all(|u| u.available);

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let health = json!({
        "status": if all_healthy { "healthy" } else { "degraded" },
        "service": state.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
        "upstreams": upstreams,
        "healthy": all_healthy,
    });

    (status_code, Json(health))
}

/// Router with `/health` and `/health/detailed`
pub fn health_routes(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/health/detailed", get(detailed_health_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_state() {
        let state = HealthState::new("parb");

        assert_eq!(state.service_name, "parb");
        assert!(state.is_healthy().await);

        state
            .record_upstream(UpstreamStatus::unavailable("okx", "https://www.okx.com", "timeout"))
            .await;
        assert!(!state.is_healthy().await);

        state
            .record_upstream(UpstreamStatus::available("okx", "https://www.okx.com"))
            .await;
        assert!(state.is_healthy().await);
        assert_eq!(state.upstreams().await.len(), 1);
    }

    #[tokio::test]
    async fn test_detailed_health_degraded() {
        let state = Arc::new(HealthState::new("parb"));
        let app = health_routes(state.clone());

        let ok = app
            .clone()
            .oneshot(Request::get("/health/detailed").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        state
            .record_upstream(UpstreamStatus::unavailable("okx", "https://www.okx.com", "HTTP 503"))
            .await;

        let degraded = app
            .clone()
            .oneshot(Request::get("/health/detailed").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(degraded.status(), StatusCode::SERVICE_UNAVAILABLE);

        // Liveness is unaffected
        let live = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(live.status(), StatusCode::OK);
    }
}
