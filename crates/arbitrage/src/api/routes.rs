//! API routes for the arbitrage monitor

use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::*;
use crate::api::ArbitrageApiState;

/// Create the API router, health endpoints included
pub fn create_router(state: ArbitrageApiState) -> Router {
    let health = server::health_routes(state.health.clone());

    Router::new()
        .route("/", get(dashboard))
        .route("/refresh", get(refresh))
        .route("/api/v1/opportunities", get(list_opportunities))
        .route("/api/v1/saved", get(list_saved).post(save_opportunity))
        .route("/api/v1/saved/:id", delete(delete_saved))
        .route("/api/v1/options/:inst_id", get(option_detail))
        .with_state(Arc::new(state))
        .merge(health)
}
