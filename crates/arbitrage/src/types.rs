//! Arbitrage domain types

use chrono::{DateTime, Utc};
use market_data::{OptionQuote, OptionType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Decoded option identifier, e.g. `BTC-USD-250328-60000-C`
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOptionId {
    /// Expiry as `YYMMDD`, not validated as a calendar date
    pub expiry: String,
    pub strike: f64,
    pub option_type: OptionType,
}

/// Remaining life of an option
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeToExpiry {
    /// Fractional years on a flat 365-day year
    pub years: f64,
    /// Fractional days
    pub days: f64,
}

impl TimeToExpiry {
    pub const ZERO: TimeToExpiry = TimeToExpiry { years: 0.0, days: 0.0 };

    pub fn from_seconds(seconds: f64) -> Self {
        let seconds = seconds.max(0.0);
        Self {
            years: seconds / crate::SECONDS_PER_YEAR,
            days: seconds / crate::SECONDS_PER_DAY,
        }
    }
}

/// A call and a put sharing expiry and strike. Call leg first.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionPair {
    pub call: OptionQuote,
    pub put: OptionQuote,
}

impl OptionPair {
    /// Both legs carry an ask and a bid
    pub fn is_quotable(&self) -> bool {
        self.call.is_two_sided() && self.put.is_two_sided()
    }
}

/// One evaluated call/put pair that cleared the rate threshold.
///
/// Prices are in quote currency except the leg ask/bid fields, which are
/// in underlying units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    /// `20YYMMDD`
    pub expiry_date: String,
    pub strike_price: f64,
    /// Spot at evaluation time
    pub btc_price: f64,
    pub days_to_expiry: f64,
    pub years_to_expiry: f64,

    pub synthetic_long_price: f64,
    pub long_price_diff: f64,
    pub long_annual_rate: f64,

    pub synthetic_short_price: f64,
    pub short_price_diff: f64,
    pub short_annual_rate: f64,

    pub call_option_id: String,
    pub call_ask: f64,
    pub call_bid: f64,

    pub put_option_id: String,
    pub put_ask: f64,
    pub put_bid: f64,

    /// Return forgone at the minimum rate over the same period
    pub opportunity_cost: f64,
}

impl ArbitrageOpportunity {
    /// The better of the two directions
    pub fn best_annual_rate(&self) -> f64 {
        self.long_annual_rate.max(self.short_annual_rate)
    }
}

/// An opportunity persisted on user request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedOpportunity {
    pub id: Uuid,
    pub captured_at: DateTime<Utc>,
    #[serde(flatten)]
    pub opportunity: ArbitrageOpportunity,
}

impl SavedOpportunity {
    pub fn new(opportunity: ArbitrageOpportunity) -> Self {
        Self {
            id: Uuid::new_v4(),
            captured_at: Utc::now(),
            opportunity,
        }
    }
}

/// Counters describing one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Quotes in the snapshot
    pub quotes: usize,
    /// Call/put pairs matched
    pub pairs: usize,
    /// Pairs with both sides quoted on both legs
    pub quotable_pairs: usize,
    /// Opportunities above the threshold
    pub accepted: usize,
}

/// Result of one scan over a market snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Spot used for evaluation, 0 when no data was available
    pub spot_price: f64,
    pub min_annual_rate: f64,
    pub opportunities: Vec<ArbitrageOpportunity>,
    pub stats: ScanStats,
    pub data_available: bool,
    pub scanned_at: DateTime<Utc>,
}

impl ScanReport {
    /// Report for a cycle without market data
    pub fn empty(min_annual_rate: f64) -> Self {
        Self {
            spot_price: 0.0,
            min_annual_rate,
            opportunities: Vec::new(),
            stats: ScanStats::default(),
            data_available: false,
            scanned_at: Utc::now(),
        }
    }
}
