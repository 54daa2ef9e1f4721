//! Cell-level parsers and casts used by type imposition and metadata generation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::input::Value;

/// Date formats tried in order. Month-first is preferred for slashed dates,
/// day-first is the fallback when the month-first reading is impossible.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y%m%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%B %d, %Y",
];

/// Datetime formats tried in order. `%.f` accepts an absent fraction.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M",
];

/// Parse a whole number.
pub fn parse_integer(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    trimmed
        .strip_prefix('+')
        .unwrap_or(trimmed)
        .parse::<i64>()
        .ok()
}

/// Parse a floating-point number.
pub fn parse_float(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// Parse a boolean token.
pub fn parse_boolean(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a calendar date, accepting datetimes by truncation.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| parse_datetime_only(trimmed).map(|dt| dt.date()))
}

/// Parse a datetime, accepting plain dates at midnight.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    parse_datetime_only(trimmed).or_else(|| {
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
            .map(|d| d.and_time(NaiveTime::MIN))
    })
}

fn parse_datetime_only(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
}

/// Cast a cell to a 64-bit integer.
pub fn to_long(value: &Value) -> Option<i64> {
    match value {
        Value::Text(s) => parse_integer(s),
        Value::Int(i) => Some(i64::from(*i)),
        Value::Long(i) => Some(*i),
        Value::Float(f) => float_to_long(*f),
        Value::Boolean(b) => Some(i64::from(*b)),
        Value::Date(_) | Value::DateTime(_) => None,
    }
}

/// Cast a cell to a 32-bit integer.
pub fn to_int(value: &Value) -> Option<i32> {
    to_long(value).and_then(|i| i32::try_from(i).ok())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_to_long(f: f64) -> Option<i64> {
    // Only integral values inside the exactly-representable range convert.
    const LIMIT: f64 = 9_007_199_254_740_992.0;
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= LIMIT).then_some(f as i64)
}

/// Cast a cell to a float.
#[allow(clippy::cast_precision_loss)]
pub fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Text(s) => parse_float(s),
        Value::Int(i) => Some(f64::from(*i)),
        Value::Long(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Date(_) | Value::DateTime(_) => None,
    }
}

/// Cast a cell to a boolean.
pub fn to_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Text(s) => parse_boolean(s),
        Value::Int(_) | Value::Long(_) | Value::Float(_) => match to_long(value) {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::Boolean(b) => Some(*b),
        Value::Date(_) | Value::DateTime(_) => None,
    }
}

/// Cast a cell to a date.
pub fn to_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Text(s) => parse_date(s),
        Value::Date(d) => Some(*d),
        Value::DateTime(dt) => Some(dt.date()),
        _ => None,
    }
}

/// Cast a cell to a datetime.
pub fn to_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Text(s) => parse_datetime(s),
        Value::Date(d) => Some(d.and_time(NaiveTime::MIN)),
        Value::DateTime(dt) => Some(*dt),
        _ => None,
    }
}

/// Cast a cell to text. Always succeeds.
pub fn to_text(value: &Value) -> Option<String> {
    Some(value.to_string())
}
