//! Put-call parity arbitrage for BTC options
//!
//! Pairs calls and puts that share an expiry and strike, prices the
//! synthetic underlying built from each pair, and compares it with spot.
//! A pair is reported when the annualised gap on either side clears the
//! configured threshold.
//!
//! # Pipeline
//!
//! 1. [`market_data::fetch_snapshot`] - spot plus the full chain
//! 2. [`pairing::pair_options`] - adjacent call/put matching on sorted ids
//! 3. [`evaluator::ArbitrageEvaluator`] - parity arithmetic and threshold
//! 4. [`aggregator::group_by_expiry`] - grouping for display
//!
//! # Feature Flags
//!
//! - `api` - HTTP API and background scan monitor (default)

pub mod aggregator;
pub mod error;
pub mod evaluator;
pub mod expiry;
pub mod pairing;
pub mod scanner;
pub mod store;
pub mod symbol;
pub mod types;

#[cfg(feature = "api")]
pub mod api;

/// Seconds in a flat 365-day year
pub const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 3600.0;
pub const SECONDS_PER_DAY: f64 = 24.0 * 3600.0;

// Re-export commonly used types
pub use aggregator::{group_by_expiry, GroupedByExpiry};
pub use error::{ArbitrageError, Result};
pub use evaluator::{ArbitrageEvaluator, DEFAULT_MIN_ANNUAL_RATE};
pub use expiry::{time_to_expiry, DEFAULT_SETTLEMENT_HOUR};
pub use pairing::pair_options;
pub use scanner::{evaluate_snapshot, ArbitrageScanner};
pub use symbol::parse_option_id;
pub use types::{
    ArbitrageOpportunity, OptionPair, ParsedOptionId, SavedOpportunity, ScanReport, ScanStats,
    TimeToExpiry,
};

// Store exports
pub use store::json_file::JsonFileOpportunityStore;
pub use store::memory::InMemoryOpportunityStore;
pub use store::traits::OpportunityStore;

#[cfg(feature = "api")]
pub use api::{create_router, ArbitrageApiState, ScanMonitor};
