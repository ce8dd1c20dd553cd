//! Put-call parity evaluation of a single call/put pair

use chrono::{DateTime, Local, TimeZone};
use tracing::trace;

use crate::expiry::{time_to_expiry_at, DEFAULT_SETTLEMENT_HOUR};
use crate::symbol::parse_option_id;
use crate::types::{ArbitrageOpportunity, OptionPair};

/// Default minimum annualized rate (5%)
pub const DEFAULT_MIN_ANNUAL_RATE: f64 = 0.05;

/// Computes synthetic forwards for a pair and applies the rate threshold.
///
/// Stateless apart from its parameters: evaluating the same pair, spot
/// and instant always gives the same result.
#[derive(Debug, Clone, Copy)]
pub struct ArbitrageEvaluator {
    min_annual_rate: f64,
    settlement_hour: u32,
}

impl ArbitrageEvaluator {
    pub fn new(min_annual_rate: f64) -> Self {
        Self {
            min_annual_rate,
            settlement_hour: DEFAULT_SETTLEMENT_HOUR,
        }
    }

    pub fn with_settlement_hour(mut self, hour: u32) -> Self {
        self.settlement_hour = hour;
        self
    }

    pub fn min_annual_rate(&self) -> f64 {
        self.min_annual_rate
    }

    pub fn settlement_hour(&self) -> u32 {
        self.settlement_hour
    }

    /// Price a pair without applying the threshold.
    ///
    /// `None` when the call identifier does not parse or a leg is missing
    /// a bid or ask.
    pub fn price_pair_at<Tz: TimeZone>(
        &self,
        pair: &OptionPair,
        spot: f64,
        now: &DateTime<Tz>,
    ) -> Option<ArbitrageOpportunity> {
        let parsed = parse_option_id(&pair.call.inst_id)?;
        let (call_ask, call_bid) = (pair.call.ask?, pair.call.bid?);
        let (put_ask, put_bid) = (pair.put.ask?, pair.put.bid?);

        let tte = time_to_expiry_at(&parsed.expiry, self.settlement_hour, now);
        let strike = parsed.strike;

        // Leg prices in quote currency
        let call_ask = call_ask * spot;
        let call_bid = call_bid * spot;
        let put_ask = put_ask * spot;
        let put_bid = put_bid * spot;

        let synthetic_long_price = strike + call_ask - put_bid;
        let synthetic_short_price = strike + call_bid - put_ask;

        let long_price_diff = spot - synthetic_long_price;
        let short_price_diff = synthetic_short_price - spot;

        let annualize = |diff: f64| {
            if tte.years > 0.0 {
                diff / spot / tte.years
            } else {
                0.0
            }
        };

        Some(ArbitrageOpportunity {
            expiry_date: format!("20{}", parsed.expiry),
            strike_price: strike,
            btc_price: spot,
            days_to_expiry: tte.days,
            years_to_expiry: tte.years,
            synthetic_long_price,
            long_price_diff,
            long_annual_rate: annualize(long_price_diff),
            synthetic_short_price,
            short_price_diff,
            short_annual_rate: annualize(short_price_diff),
            call_option_id: pair.call.inst_id.clone(),
            call_ask: call_ask / spot,
            call_bid: call_bid / spot,
            put_option_id: pair.put.inst_id.clone(),
            put_ask: put_ask / spot,
            put_bid: put_bid / spot,
            opportunity_cost: spot * tte.years * self.min_annual_rate,
        })
    }

    /// Either direction reaches the threshold (inclusive)
    pub fn accepts(&self, opportunity: &ArbitrageOpportunity) -> bool {
        opportunity.long_annual_rate >= self.min_annual_rate
            || opportunity.short_annual_rate >= self.min_annual_rate
    }

    /// Price a pair at `now` and keep it only if it clears the threshold
    pub fn evaluate_at<Tz: TimeZone>(
        &self,
        pair: &OptionPair,
        spot: f64,
        now: &DateTime<Tz>,
    ) -> Option<ArbitrageOpportunity> {
        let opportunity = self.price_pair_at(pair, spot, now)?;
        if self.accepts(&opportunity) {
            Some(opportunity)
        } else {
            trace!(
                call = %opportunity.call_option_id,
                long_rate = opportunity.long_annual_rate,
                short_rate = opportunity.short_annual_rate,
                "Below threshold"
            );
            None
        }
    }

    /// [`evaluate_at`](Self::evaluate_at) against the current local time
    pub fn evaluate(&self, pair: &OptionPair, spot: f64) -> Option<ArbitrageOpportunity> {
        self.evaluate_at(pair, spot, &Local::now())
    }
}

impl Default for ArbitrageEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ANNUAL_RATE)
    }
}
