//! Black-Scholes pricing and implied volatility helpers

use std::f64::consts::PI;
use crate::types::{BSInputs, OptionType};

/// Fixed risk-free rate used by the implied volatility search
pub const RISK_FREE_RATE: f64 = 0.045;
pub const MIN_VOL: f64 = 0.01;
pub const MAX_VOL: f64 = 5.0;

/// Linear search: starting volatility
pub const IV_START: f64 = 0.30;
/// Linear search: step added before each pricing attempt
pub const IV_STEP: f64 = 0.0005;
/// Linear search: number of attempts
pub const IV_MAX_STEPS: usize = 2000;
/// Linear search: accepted absolute price error, in quote currency
pub const IV_PRICE_TOLERANCE: f64 = 5.0;

pub fn norm_pdf(x: f64) -> f64 {
    (1.0 / (2.0 * PI).sqrt()) * (-0.5 * x * x).exp()
}

pub fn norm_cdf(x: f64) -> f64 {
    let k = 1.0 / (1.0 + 0.2316419 * x.abs());
    let poly = k * (0.319381530
        + k * (-0.356563782
        + k * (1.781477937
        + k * (-1.821255978
        + k * 1.330274429))));

    let approx = 1.0 - norm_pdf(x) * poly;

    if x >= 0.0 {
        approx
    } else {
        1.0 - approx
    }
}

pub fn d1_d2(input: &BSInputs) -> (f64, f64) {
    let s = input.spot;
    let k = input.strike;
    let t = input.time.max(1e-6);
    let v = input.vol.max(1e-6);
    let r = input.rate;

    let d1 = ((s / k).ln() + (r + 0.5 * v * v) * t) / (v * t.sqrt());
    let d2 = d1 - v * t.sqrt();

    (d1, d2)
}

pub fn black_scholes_price(mut input: BSInputs) -> f64 {
    input.validate();

    let (d1, d2) = d1_d2(&input);
    let s = input.spot;
    let k = input.strike;
    let t = input.time;
    let r = input.rate;

    let price = match input.option_type {
        OptionType::Call => s * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2),
        OptionType::Put => k * (-r * t).exp() * norm_cdf(-d2) - s * norm_cdf(-d1),
    };

    price.max(0.0)
}

/// ∂V/∂σ, same for calls and puts
pub fn vega(mut input: BSInputs) -> f64 {
    input.validate();
    let (d1, _) = d1_d2(&input);
    input.spot * norm_pdf(d1) * input.time.sqrt()
}

pub fn intrinsic_value(spot: f64, strike: f64, option_type: OptionType) -> f64 {
    match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    }
}

/// Premium above intrinsic value, floored at zero.
///
/// `option_price` and `spot` must be in the same (quote) currency.
pub fn time_value(option_price: f64, spot: f64, strike: f64, option_type: OptionType) -> f64 {
    (option_price - intrinsic_value(spot, strike, option_type)).max(0.0)
}

/// Implied volatility by fixed-step linear search.
///
/// Starts at 0.30 and, for up to 2000 attempts, first adds 0.0005 and then
/// prices the option at [`RISK_FREE_RATE`]. Stops at the first price within
/// 5 quote-currency units of `option_price`. Returns the volatility rounded
/// to 5 decimals; when nothing matches, the last value tried (1.30).
pub fn implied_volatility(
    option_price: f64,
    spot: f64,
    strike: f64,
    years: f64,
    option_type: OptionType,
) -> f64 {
    let mut sigma = IV_START;

    for _ in 0..IV_MAX_STEPS {
        sigma += IV_STEP;
        let price = black_scholes_price(BSInputs {
            spot,
            strike,
            time: years,
            vol: sigma,
            rate: RISK_FREE_RATE,
            option_type,
        });
        if (price - option_price).abs() <= IV_PRICE_TOLERANCE {
            break;
        }
    }

    (sigma * 1e5).round() / 1e5
}

/// Newton-Raphson implied volatility. `None` if it does not converge.
pub fn implied_volatility_newton(market_price: f64, mut input: BSInputs) -> Option<f64> {
    let mut vol = IV_START;

    for _ in 0..100 {
        input.vol = vol;

        let price = black_scholes_price(input);
        let v = vega(input);

        if (price - market_price).abs() < 1e-6 {
            return Some(vol);
        }

        if v.abs() < 1e-8 {
            break;
        }

        vol -= (price - market_price) / v;
        vol = vol.clamp(MIN_VOL, MAX_VOL);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atm_call(vol: f64) -> BSInputs {
        BSInputs {
            spot: 50000.0,
            strike: 50000.0,
            time: 30.0 / 365.0,
            vol,
            rate: RISK_FREE_RATE,
            option_type: OptionType::Call,
        }
    }

    #[test]
    fn test_call_price_itm() {
        let input = BSInputs {
            spot: 60000.0,
            strike: 50000.0,
            time: 30.0 / 365.0,
            vol: 0.5,
            rate: 0.0,
            option_type: OptionType::Call,
        };

        assert!(black_scholes_price(input) >= 10000.0);
    }

    #[test]
    fn test_put_call_parity() {
        let call = black_scholes_price(atm_call(0.5));
        let put = black_scholes_price(BSInputs {
            option_type: OptionType::Put,
            ..atm_call(0.5)
        });

        let t = 30.0 / 365.0;
        let rhs = 50000.0 - 50000.0 * (-RISK_FREE_RATE * t).exp();
        assert!((call - put - rhs).abs() < 1.0);
    }

    #[test]
    fn test_vega_positive() {
        assert!(vega(atm_call(0.5)) > 0.0);
    }

    #[test]
    fn test_intrinsic_value() {
        assert!((intrinsic_value(60000.0, 50000.0, OptionType::Call) - 10000.0).abs() < 0.01);
        assert!((intrinsic_value(40000.0, 50000.0, OptionType::Put) - 10000.0).abs() < 0.01);
        assert!(intrinsic_value(40000.0, 50000.0, OptionType::Call).abs() < 0.01);
        assert!(intrinsic_value(60000.0, 50000.0, OptionType::Put).abs() < 0.01);
    }

    #[test]
    fn test_time_value() {
        // ITM call: 12000 premium, 10000 intrinsic
        assert!((time_value(12000.0, 60000.0, 50000.0, OptionType::Call) - 2000.0).abs() < 1e-9);
        // OTM put is all time value
        assert!((time_value(800.0, 60000.0, 50000.0, OptionType::Put) - 800.0).abs() < 1e-9);
        // Premium below intrinsic floors at zero
        assert_eq!(time_value(9000.0, 60000.0, 50000.0, OptionType::Call), 0.0);
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        assert!((norm_cdf(0.5) + norm_cdf(-0.5) - 1.0).abs() < 1e-10);
        assert!((norm_cdf(10.0) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_linear_search_recovers_vol() {
        let price = black_scholes_price(atm_call(0.6));
        let iv = implied_volatility(price, 50000.0, 50000.0, 30.0 / 365.0, OptionType::Call);

        assert!((iv - 0.6).abs() < 0.01, "iv = {}", iv);
    }

    #[test]
    fn test_linear_search_fallback() {
        // Unreachable price: no volatility in range prices a call above spot
        let iv = implied_volatility(1_000_000.0, 50000.0, 50000.0, 30.0 / 365.0, OptionType::Call);
        assert_eq!(iv, 1.3);
    }

    #[test]
    fn test_linear_search_rounds_to_five_places() {
        let price = black_scholes_price(atm_call(0.45));
        let iv = implied_volatility(price, 50000.0, 50000.0, 30.0 / 365.0, OptionType::Call);
        assert_eq!(iv, (iv * 1e5).round() / 1e5);
        assert!(iv > IV_START);
    }

    #[test]
    fn test_newton_roundtrip() {
        let input = atm_call(0.5);
        let price = black_scholes_price(input);
        let recovered = implied_volatility_newton(price, input).unwrap();
        assert!((recovered - 0.5).abs() < 0.01);
    }
}
