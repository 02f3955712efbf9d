use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::json_converter::is_truthy;

/// Epoch values above this are milliseconds, below are seconds.
const MILLIS_CUTOFF: f64 = 1e12;

fn from_epoch(n: f64) -> Option<DateTime<Utc>> {
    if !n.is_finite() {
        return None;
    }
    let millis = if n > MILLIS_CUTOFF { n } else { n * 1000.0 };
    DateTime::<Utc>::from_timestamp_millis(millis as i64)
}

fn from_text(s: &str) -> Option<DateTime<Utc>> {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse::<f64>().ok().and_then(from_epoch);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a backend timestamp: epoch seconds or milliseconds (number or
/// digit string), RFC 3339, or a naive ISO date-time taken as UTC.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_f64().and_then(from_epoch),
        Value::String(s) => from_text(s.trim()),
        _ => None,
    }
}

/// `YYYY-MM-DD HH:MM:SS UTC`, or the input echoed back when it is not a date.
pub fn format_utc_date(value: &Value) -> String {
    match parse_timestamp(value) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    }
}

/// Last-login cell text: `Never` when absent, `Invalid Date` when unparseable.
pub fn last_login_display(value: Option<&Value>) -> String {
    match value {
        Some(v) if is_truthy(v) => match parse_timestamp(v) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => "Invalid Date".to_string(),
        },
        _ => "Never".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn epoch_seconds_and_millis() {
        assert_eq!(format_utc_date(&json!(1_700_000_000)), "2023-11-14 22:13:20 UTC");
        assert_eq!(format_utc_date(&json!(1_700_000_000_000i64)), "2023-11-14 22:13:20 UTC");
        assert_eq!(format_utc_date(&json!("1700000000")), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn iso_strings() {
        assert_eq!(format_utc_date(&json!("2024-03-01T10:20:30Z")), "2024-03-01 10:20:30 UTC");
        assert_eq!(format_utc_date(&json!("2024-03-01T12:20:30+02:00")), "2024-03-01 10:20:30 UTC");
        assert_eq!(format_utc_date(&json!("2024-03-01T10:20:30.123")), "2024-03-01 10:20:30 UTC");
    }

    #[test]
    fn unparseable_value_is_echoed() {
        assert_eq!(format_utc_date(&json!("yesterday")), "yesterday");
    }

    #[test]
    fn last_login_fallbacks() {
        assert_eq!(last_login_display(None), "Never");
        assert_eq!(last_login_display(Some(&json!(""))), "Never");
        assert_eq!(last_login_display(Some(&json!("soon"))), "Invalid Date");
        assert_eq!(last_login_display(Some(&json!("2024-01-02"))), "2024-01-02 00:00:00 UTC");
    }
}
