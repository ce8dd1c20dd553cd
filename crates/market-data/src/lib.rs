//! Market Data for the parity arbitrage monitor
//!
//! This crate is the I/O boundary of the system: it fetches the spot price
//! of the underlying and the full option chain, and carries the option
//! pricing helpers.
//!
//! # Core Components
//!
//! - [`provider`] - Provider trait, static provider and snapshot fetching
//! - [`okx`] - OKX public REST provider
//! - [`black_scholes`] - Black-Scholes pricing, implied volatility, time value
//! - [`types`] - Quotes, snapshots and option types
//!
//! # Key Invariants
//!
//! - Option prices are quoted in units of the underlying (BTC)
//! - A missing bid or ask is `None`, never zero
//! - A failed fetch is "no data", never a panic

pub mod black_scholes;
pub mod error;
pub mod okx;
pub mod provider;
pub mod types;

pub use error::MarketDataError;
pub use okx::OkxProvider;
pub use provider::{fetch_snapshot, MarketDataProvider, StaticProvider};
pub use types::{BSInputs, MarketSnapshot, OptionQuote, OptionType};

pub type Result<T> = std::result::Result<T, MarketDataError>;
