//! API models for the arbitrage HTTP endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregator::GroupedByExpiry;
use crate::types::{ArbitrageOpportunity, SavedOpportunity, ScanStats};

/// `?min_rate=` query parameter
#[derive(Debug, Default, Deserialize)]
pub struct RateQuery {
    pub min_rate: Option<f64>,
}

/// Root finder used for implied volatility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IvSolver {
    /// Fixed-step search from 30%, tolerance of 5 quote units
    #[default]
    Linear,
    /// Newton-Raphson on vega; no value when it does not converge
    Newton,
}

/// `?iv_solver=` query parameter of the option detail endpoint
#[derive(Debug, Default, Deserialize)]
pub struct OptionDetailQuery {
    #[serde(default)]
    pub iv_solver: IvSolver,
}

/// Everything the dashboard page shows
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub opportunities: GroupedByExpiry<ArbitrageOpportunity>,
    pub saved_opportunities: GroupedByExpiry<SavedOpportunity>,
    pub min_rate: f64,
    /// Local wall-clock time, `YYYY-MM-DD HH:MM:SS`
    pub current_time: String,
    /// Spot price, 0 when unavailable
    pub btc_price: f64,
}

/// Current opportunities with scan details
#[derive(Debug, Serialize, Deserialize)]
pub struct OpportunitiesResponse {
    pub spot_price: f64,
    pub min_rate: f64,
    pub data_available: bool,
    pub stats: ScanStats,
    pub scanned_at: DateTime<Utc>,
    pub opportunities: GroupedByExpiry<ArbitrageOpportunity>,
}

/// Saved opportunities grouped by expiry
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedResponse {
    pub count: usize,
    pub saved: GroupedByExpiry<SavedOpportunity>,
}

/// Single option with derived pricing
#[derive(Debug, Serialize, Deserialize)]
pub struct OptionDetailResponse {
    pub inst_id: String,
    /// Ask in underlying units
    pub ask: Option<f64>,
    /// Bid in underlying units
    pub bid: Option<f64>,
    pub expiry_date: String,
    pub strike_price: f64,
    pub option_type: String,
    pub spot_price: f64,
    pub days_to_expiry: f64,
    /// Mid price in quote currency, when both sides are quoted
    pub mid_price: Option<f64>,
    pub time_value: Option<f64>,
    pub implied_volatility: Option<f64>,
    pub iv_solver: IvSolver,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
