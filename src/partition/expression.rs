//! Date expression parsing
//!
//! Accepts the relative phrases users put into configs (`now`,
//! `30 days ago`) as well as absolute dates and timestamps.

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Format of every timestamp sent to the API
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Format of day partition labels
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static RELATIVE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+)\s+(second|minute|hour|day|week|month|year)s?\s+ago$")
        .expect("relative date pattern is valid")
});

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a date expression relative to `now`.
///
/// Returns `None` when the expression is not understood.
pub fn parse_date_expression(expr: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let expr = expr.trim();

    match expr.to_ascii_lowercase().as_str() {
        "now" | "today" => return Some(now),
        "yesterday" => return now.checked_sub_signed(Duration::days(1)),
        _ => {}
    }

    if let Some(caps) = RELATIVE_REGEX.captures(expr) {
        let amount: i64 = caps[1].parse().ok()?;
        return subtract(now, amount, &caps[2].to_ascii_lowercase());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(expr) {
        return Some(dt.naive_utc());
    }

    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(expr, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(expr, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn subtract(now: NaiveDateTime, amount: i64, unit: &str) -> Option<NaiveDateTime> {
    let months = |n: i64| u32::try_from(n).ok().map(Months::new);

    match unit {
        "second" => now.checked_sub_signed(Duration::try_seconds(amount)?),
        "minute" => now.checked_sub_signed(Duration::try_minutes(amount)?),
        "hour" => now.checked_sub_signed(Duration::try_hours(amount)?),
        "day" => now.checked_sub_signed(Duration::try_days(amount)?),
        "week" => now.checked_sub_signed(Duration::try_weeks(amount)?),
        "month" => now.checked_sub_months(months(amount)?),
        "year" => now.checked_sub_months(months(amount.checked_mul(12)?)?),
        _ => None,
    }
}

/// Parse the date expression of config field `field`
pub fn resolve_date(field: &str, expr: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    parse_date_expression(expr, now).ok_or_else(|| Error::InvalidDate {
        field: field.to_string(),
        value: expr.to_string(),
    })
}
