use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Local, TimeZone};

/// Seconds since the Unix epoch, with sub-second precision. A clock set
/// before the epoch reads as 0.
pub fn now_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

pub fn format_timestamp(ts: f64) -> String {
    if ts <= 0.0 || !ts.is_finite() {
        return "N/A".to_string();
    }
    #[allow(clippy::cast_possible_truncation)]
    let secs = ts.trunc() as i64;
    match Local.timestamp_opt(secs, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "N/A".to_string(),
    }
}
