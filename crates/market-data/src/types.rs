//! Shared types for Market Data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Single-letter tag used as the last field of an option identifier
    pub fn code(&self) -> &'static str {
        match self {
            OptionType::Call => "C",
            OptionType::Put => "P",
        }
    }

    /// Parse the identifier tag. Only an exact `C` or `P` is accepted.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "C" => Some(OptionType::Call),
            "P" => Some(OptionType::Put),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

/// Best bid/ask of a single option contract.
///
/// Prices are quoted in units of the underlying (BTC per contract). A side
/// with no resting orders is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Exchange identifier, e.g. `BTC-USD-250328-60000-C`
    pub inst_id: String,
    /// Best ask in underlying units
    pub ask: Option<f64>,
    /// Best bid in underlying units
    pub bid: Option<f64>,
}

impl OptionQuote {
    pub fn new(inst_id: impl Into<String>, ask: Option<f64>, bid: Option<f64>) -> Self {
        Self {
            inst_id: inst_id.into(),
            ask,
            bid,
        }
    }

    /// Both sides of the book are present
    pub fn is_two_sided(&self) -> bool {
        self.ask.is_some() && self.bid.is_some()
    }
}

/// Spot price plus the full option chain, captured at one instant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Spot price in quote currency
    pub spot_price: f64,
    pub quotes: Vec<OptionQuote>,
    pub fetched_at: DateTime<Utc>,
}

impl MarketSnapshot {
    pub fn new(spot_price: f64, quotes: Vec<OptionQuote>) -> Self {
        Self {
            spot_price,
            quotes,
            fetched_at: Utc::now(),
        }
    }
}

/// Inputs for Black-Scholes pricing
#[derive(Debug, Clone, Copy)]
pub struct BSInputs {
    /// Spot price of the underlying
    pub spot: f64,
    /// Strike price
    pub strike: f64,
    /// Time to expiry (in years)
    pub time: f64,
    /// Volatility (as decimal, e.g., 0.5 = 50%)
    pub vol: f64,
    /// Risk-free rate
    pub rate: f64,
    /// Option type
    pub option_type: OptionType,
}

impl BSInputs {
    /// Validate and clamp inputs to safe ranges
    pub fn validate(&mut self) {
        self.time = self.time.max(1.0 / (365.0 * 24.0 * 3600.0));
        self.vol = self.vol.clamp(0.01, 5.0);
        self.spot = self.spot.max(1e-6);
        self.strike = self.strike.max(1e-6);
    }
}

/// Parse a decimal price field where an empty string means "no price".
pub fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|p| p.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_type_codes() {
        assert_eq!(OptionType::Call.code(), "C");
        assert_eq!(OptionType::Put.code(), "P");
        assert_eq!(OptionType::from_code("C"), Some(OptionType::Call));
        assert_eq!(OptionType::from_code("P"), Some(OptionType::Put));
        assert_eq!(OptionType::from_code("c"), None);
        assert_eq!(OptionType::from_code("X"), None);
    }

    #[test]
    fn test_two_sided_quote() {
        assert!(OptionQuote::new("A", Some(0.1), Some(0.09)).is_two_sided());
        assert!(!OptionQuote::new("A", None, Some(0.09)).is_two_sided());
        assert!(!OptionQuote::new("A", Some(0.1), None).is_two_sided());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("0.0345"), Some(0.0345));
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("  "), None);
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price("NaN"), None);
    }
}
