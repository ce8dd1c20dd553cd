//! API handlers for the arbitrage HTTP endpoints

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use chrono::Local;
use market_data::black_scholes::{
    implied_volatility, implied_volatility_newton, time_value, IV_START, RISK_FREE_RATE,
};
use market_data::{BSInputs, MarketDataError};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::aggregator::group_by_expiry;
use crate::api::models::*;
use crate::api::ArbitrageApiState;
use crate::error::ArbitrageError;
use crate::expiry::time_to_expiry;
use crate::symbol::parse_option_id;
use crate::types::{ArbitrageOpportunity, SavedOpportunity};

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<T, ApiError>;

fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message: message.into(),
            },
        }),
    )
}

fn map_error(e: ArbitrageError) -> ApiError {
    match e {
        ArbitrageError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Saved opportunity {} not found", id),
        ),
        ArbitrageError::InvalidInput(msg) => {
            error_response(StatusCode::BAD_REQUEST, "INVALID_INPUT", msg)
        }
        ArbitrageError::MarketData(e @ MarketDataError::DataNotAvailable(_)) => {
            error_response(StatusCode::NOT_FOUND, "NOT_AVAILABLE", e.to_string())
        }
        ArbitrageError::MarketData(e) => {
            error_response(StatusCode::BAD_GATEWAY, "MARKET_DATA_UNAVAILABLE", e.to_string())
        }
        other => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            other.to_string(),
        ),
    }
}

fn resolve_min_rate(
    state: &ArbitrageApiState,
    query: Result<Query<RateQuery>, QueryRejection>,
) -> ApiResult<f64> {
    let Query(query) = query.map_err(|rejection| {
        error_response(StatusCode::BAD_REQUEST, "INVALID_MIN_RATE", rejection.body_text())
    })?;

    match query.min_rate {
        None => Ok(state.default_min_rate),
        Some(rate) if rate.is_finite() => Ok(rate),
        Some(rate) => Err(error_response(
            StatusCode::BAD_REQUEST,
            "INVALID_MIN_RATE",
            format!("min_rate {} is not a finite number", rate),
        )),
    }
}

/// Dashboard data: current and saved opportunities
pub async fn dashboard(
    State(state): State<Arc<ArbitrageApiState>>,
    query: Result<Query<RateQuery>, QueryRejection>,
) -> ApiResult<Json<DashboardResponse>> {
    let min_rate = resolve_min_rate(&state, query)?;

    let report = state.scanner.scan(min_rate).await;
    state.record_scan_health(&report).await;

    let saved = state.store.list().await.map_err(map_error)?;

    Ok(Json(DashboardResponse {
        opportunities: group_by_expiry(report.opportunities),
        saved_opportunities: group_by_expiry(saved),
        min_rate,
        current_time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        btc_price: report.spot_price,
    }))
}

/// Current opportunities with scan statistics
pub async fn list_opportunities(
    State(state): State<Arc<ArbitrageApiState>>,
    query: Result<Query<RateQuery>, QueryRejection>,
) -> ApiResult<Json<OpportunitiesResponse>> {
    let min_rate = resolve_min_rate(&state, query)?;

    let report = state.scanner.scan(min_rate).await;
    state.record_scan_health(&report).await;

    Ok(Json(OpportunitiesResponse {
        spot_price: report.spot_price,
        min_rate,
        data_available: report.data_available,
        stats: report.stats,
        scanned_at: report.scanned_at,
        opportunities: group_by_expiry(report.opportunities),
    }))
}

/// Saved opportunities grouped by expiry
pub async fn list_saved(
    State(state): State<Arc<ArbitrageApiState>>,
) -> ApiResult<Json<SavedResponse>> {
    let saved = state.store.list().await.map_err(map_error)?;
    Ok(Json(SavedResponse {
        count: saved.len(),
        saved: group_by_expiry(saved),
    }))
}

/// Save an opportunity
pub async fn save_opportunity(
    State(state): State<Arc<ArbitrageApiState>>,
    Json(opportunity): Json<ArbitrageOpportunity>,
) -> ApiResult<(StatusCode, Json<SavedOpportunity>)> {
    let saved = state.store.save(opportunity).await.map_err(map_error)?;
    info!(
        id = %saved.id,
        expiry = %saved.opportunity.expiry_date,
        strike = saved.opportunity.strike_price,
        "Saved opportunity"
    );
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Delete a saved opportunity
pub async fn delete_saved(
    State(state): State<Arc<ArbitrageApiState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = Uuid::parse_str(&id).map_err(|_| {
        error_response(StatusCode::BAD_REQUEST, "INVALID_ID", "Invalid opportunity ID format")
    })?;

    state.store.delete(id).await.map_err(map_error)?;
    info!(%id, "Deleted saved opportunity");
    Ok(StatusCode::NO_CONTENT)
}

/// Redirect to the dashboard with the requested threshold
pub async fn refresh(
    State(state): State<Arc<ArbitrageApiState>>,
    query: Result<Query<RateQuery>, QueryRejection>,
) -> ApiResult<Redirect> {
    let min_rate = resolve_min_rate(&state, query)?;
    Ok(Redirect::to(&format!("/?min_rate={}", min_rate)))
}

/// One option with mid price, time value and implied volatility
pub async fn option_detail(
    State(state): State<Arc<ArbitrageApiState>>,
    Path(inst_id): Path<String>,
    query: Result<Query<OptionDetailQuery>, QueryRejection>,
) -> ApiResult<Json<OptionDetailResponse>> {
    let Query(query) = query.map_err(|rejection| {
        error_response(StatusCode::BAD_REQUEST, "INVALID_IV_SOLVER", rejection.body_text())
    })?;

    let parsed = parse_option_id(&inst_id).ok_or_else(|| {
        error_response(
            StatusCode::BAD_REQUEST,
            "INVALID_OPTION_ID",
            format!("{} is not an option identifier", inst_id),
        )
    })?;

    let quote = state.scanner.fetch_option(&inst_id).await.map_err(map_error)?;
    let spot = state.scanner.spot_price().await.map_err(map_error)?;
    let tte = time_to_expiry(&parsed.expiry, state.scanner.settlement_hour());

    let mid_price = match (quote.ask, quote.bid) {
        (Some(ask), Some(bid)) => Some((ask + bid) / 2.0 * spot),
        _ => None,
    };

    let time_value = mid_price.map(|p| time_value(p, spot, parsed.strike, parsed.option_type));
    let implied_volatility = mid_price
        .filter(|_| tte.years > 0.0)
        .and_then(|p| match query.iv_solver {
            IvSolver::Linear => Some(implied_volatility(
                p,
                spot,
                parsed.strike,
                tte.years,
                parsed.option_type,
            )),
            IvSolver::Newton => implied_volatility_newton(
                p,
                BSInputs {
                    spot,
                    strike: parsed.strike,
                    time: tte.years,
                    vol: IV_START,
                    rate: RISK_FREE_RATE,
                    option_type: parsed.option_type,
                },
            ),
        });

    if mid_price.is_none() {
        warn!(%inst_id, "Option is not quoted on both sides");
    }

    Ok(Json(OptionDetailResponse {
        inst_id: quote.inst_id,
        ask: quote.ask,
        bid: quote.bid,
        expiry_date: format!("20{}", parsed.expiry),
        strike_price: parsed.strike,
        option_type: parsed.option_type.to_string(),
        spot_price: spot,
        days_to_expiry: tte.days,
        mid_price,
        time_value,
        implied_volatility,
        iv_solver: query.iv_solver,
    }))
}
