use chrono::{DateTime, Utc};

/// Milliseconds in one calendar day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Returns the current Unix timestamp in seconds.
pub fn current_unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Parses an RFC 3339 timestamp (as GitHub emits them) into UTC.
pub fn parse_rfc3339_utc(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Returns the signed whole-day distance from `now` to `at`.
///
/// Negative values are in the past. Half days round toward the future, so an
/// event 2.5 days ago counts as `-2` and one 2.5 days ahead counts as `3`.
pub fn signed_day_offset(at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let diff_ms = at.signed_duration_since(now).num_milliseconds();
    diff_ms
        .saturating_add(MILLIS_PER_DAY / 2)
        .div_euclid(MILLIS_PER_DAY)
}
