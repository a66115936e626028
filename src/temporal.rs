// ⏰ Timestamps - ISO-8601-ish strings → epoch milliseconds
//
// Entity timestamps come from the backend as strings (or not at all).
// Missing or unparseable values read as epoch 0, i.e. the oldest possible.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::warn;

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a timestamp. Offset-less values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Milliseconds since the epoch, 0 for missing or unparseable input
pub fn timestamp_millis(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return 0;
    };
    match parse_timestamp(raw) {
        Some(dt) => dt.timestamp_millis(),
        None => {
            if !raw.trim().is_empty() {
                warn!(timestamp = raw, "unparseable timestamp, treating as epoch");
            }
            0
        }
    }
}

/// UTC calendar day (`YYYY-MM-DD`) of an epoch-millisecond instant
pub fn day_key(ms: i64) -> String {
    match Utc.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "1970-01-01".to_string(),
    }
}
