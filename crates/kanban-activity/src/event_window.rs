use chrono::{DateTime, Utc};
use kanban_core::signed_day_offset;

use crate::project_event::ProjectEvent;

/// Lookback window applied when the configured value is missing or unusable.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

/// Normalizes a raw lookback-days setting, falling back to [`DEFAULT_LOOKBACK_DAYS`].
pub fn resolve_lookback_days(raw: Option<&str>) -> u32 {
    raw.map(str::trim)
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(DEFAULT_LOOKBACK_DAYS)
}

/// Returns true when `at` is not in the future and lies within `lookback_days` of `now`.
pub fn is_within_event_window(at: DateTime<Utc>, now: DateTime<Utc>, lookback_days: u32) -> bool {
    if at > now {
        return false;
    }
    let days_ago = signed_day_offset(at, now);
    days_ago <= 0 && days_ago.unsigned_abs() <= u64::from(lookback_days)
}

/// Orders events by time; ties fall back to kind and column names so the
/// result depends only on the event multiset, never on fetch order.
pub fn sort_events_chronologically(events: &mut [ProjectEvent]) {
    events.sort_by(|left, right| {
        left.created_at
            .cmp(&right.created_at)
            .then_with(|| left.event.cmp(&right.event))
            .then_with(|| left.previous_column_name.cmp(&right.previous_column_name))
            .then_with(|| left.column_name.cmp(&right.column_name))
            .then_with(|| left.project_id.cmp(&right.project_id))
    });
}

/// Selects the events inside the lookback window, oldest first.
pub fn filter_events_in_window(
    events: &[ProjectEvent],
    now: DateTime<Utc>,
    lookback_days: u32,
) -> Vec<ProjectEvent> {
    let mut selected = events
        .iter()
        .filter(|event| is_within_event_window(event.created_at, now, lookback_days))
        .cloned()
        .collect::<Vec<_>>();
    sort_events_chronologically(&mut selected);
    selected
}
