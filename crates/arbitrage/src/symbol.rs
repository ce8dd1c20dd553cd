//! Option identifier parsing
//!
//! Identifiers follow the exchange convention
//! `UNDERLYING-QUOTE-YYMMDD-STRIKE-TYPE`, e.g. `BTC-USD-250328-60000-C`.

use market_data::OptionType;

use crate::types::ParsedOptionId;

/// Number of dash-separated fields in an option identifier
pub const OPTION_ID_FIELDS: usize = 5;

/// Decode an option identifier.
///
/// Returns `None` unless the identifier has exactly five fields, a finite
/// numeric strike and a `C`/`P` tag. The expiry field is passed through
/// unchecked.
pub fn parse_option_id(inst_id: &str) -> Option<ParsedOptionId> {
    let parts: Vec<&str> = inst_id.split('-').collect();
    if parts.len() != OPTION_ID_FIELDS {
        return None;
    }

    let strike = parts[3].parse::<f64>().ok().filter(|s| s.is_finite())?;
    let option_type = OptionType::from_code(parts[4])?;

    Some(ParsedOptionId {
        expiry: parts[2].to_string(),
        strike,
        option_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_call() {
        let parsed = parse_option_id("BTC-USD-250328-60000-C").unwrap();
        assert_eq!(parsed.expiry, "250328");
        assert_eq!(parsed.strike, 60000.0);
        assert_eq!(parsed.option_type, OptionType::Call);
    }

    #[test]
    fn test_parse_put_fractional_strike() {
        let parsed = parse_option_id("BTC-USD-250328-62500.5-P").unwrap();
        assert_eq!(parsed.strike, 62500.5);
        assert_eq!(parsed.option_type, OptionType::Put);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let id = "BTC-USD-241227-100000-P";
        assert_eq!(parse_option_id(id), parse_option_id(id));
    }

    #[test]
    fn test_wrong_field_count() {
        assert!(parse_option_id("BTC-USD-250328-60000").is_none());
        assert!(parse_option_id("BTC-USD-250328-60000-C-X").is_none());
        assert!(parse_option_id("BTC-20240315-50000-C").is_none());
        assert!(parse_option_id("").is_none());
    }

    #[test]
    fn test_bad_strike_or_tag() {
        assert!(parse_option_id("BTC-USD-250328-abc-C").is_none());
        assert!(parse_option_id("BTC-USD-250328-inf-C").is_none());
        assert!(parse_option_id("BTC-USD-250328-60000-X").is_none());
        assert!(parse_option_id("BTC-USD-250328-60000-c").is_none());
    }

    #[test]
    fn test_expiry_not_validated() {
        let parsed = parse_option_id("BTC-USD-991399-60000-C").unwrap();
        assert_eq!(parsed.expiry, "991399");
    }
}
