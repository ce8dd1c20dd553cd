//! Time-to-expiry calculation
//!
//! Options settle at a fixed hour on their expiry date. The settlement
//! instant is interpreted in the time zone of the supplied "now".

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use tracing::debug;

use crate::types::TimeToExpiry;

/// Default settlement hour (16:00)
pub const DEFAULT_SETTLEMENT_HOUR: u32 = 16;

/// Parse `YYMMDD` into a date in the 2000s
pub fn parse_expiry_date(expiry: &str) -> Option<NaiveDate> {
    if expiry.len() != 6 || !expiry.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = expiry[0..2].parse().ok()?;
    let month: u32 = expiry[2..4].parse().ok()?;
    let day: u32 = expiry[4..6].parse().ok()?;
    NaiveDate::from_ymd_opt(2000 + year, month, day)
}

/// Time from `now` until settlement of `expiry` (`YYMMDD`).
///
/// Clamped at zero once settlement has passed. An unparseable expiry or
/// settlement instant yields [`TimeToExpiry::ZERO`].
pub fn time_to_expiry_at<Tz: TimeZone>(
    expiry: &str,
    settlement_hour: u32,
    now: &DateTime<Tz>,
) -> TimeToExpiry {
    let Some(settlement) = parse_expiry_date(expiry)
        .and_then(|date| date.and_hms_opt(settlement_hour, 0, 0))
        .and_then(|naive| now.timezone().from_local_datetime(&naive).earliest())
    else {
        debug!(expiry, settlement_hour, "Unparseable expiry, treating as expired");
        return TimeToExpiry::ZERO;
    };

    let millis = settlement.signed_duration_since(now.clone()).num_milliseconds();
    TimeToExpiry::from_seconds(millis as f64 / 1000.0)
}

/// Time until settlement measured from the current local time
pub fn time_to_expiry(expiry: &str, settlement_hour: u32) -> TimeToExpiry {
    time_to_expiry_at(expiry, settlement_hour, &Local::now())
}
