use chrono::{DateTime, Utc};
use kanban_core::signed_day_offset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Comment counts for one issue.
pub struct CommentActivity {
    pub total_comments: usize,
    pub period_comments: usize,
}

/// Counts all comments and those within `lookback_days` of `now`.
///
/// Unlike the event window this one is symmetric: comments dated slightly in
/// the future still count toward the period.
pub fn summarize_comment_activity<I>(
    comment_times: I,
    now: DateTime<Utc>,
    lookback_days: u32,
) -> CommentActivity
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    comment_times
        .into_iter()
        .fold(CommentActivity::default(), |mut activity, created_at| {
            activity.total_comments += 1;
            if signed_day_offset(created_at, now).unsigned_abs() <= u64::from(lookback_days) {
                activity.period_comments += 1;
            }
            activity
        })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{summarize_comment_activity, CommentActivity};

    #[test]
    fn unit_summarize_comment_activity_handles_no_comments() {
        let now = Utc.with_ymd_and_hms(2026, 7, 4, 0, 0, 0).unwrap();
        assert_eq!(
            summarize_comment_activity(Vec::new(), now, 7),
            CommentActivity::default()
        );
    }

    #[test]
    fn functional_summarize_comment_activity_splits_period_from_total() {
        let now = Utc.with_ymd_and_hms(2026, 7, 4, 0, 0, 0).unwrap();
        let comments = vec![
            now - Duration::days(30),
            now - Duration::days(7),
            now - Duration::days(8),
            now - Duration::hours(2),
        ];
        assert_eq!(
            summarize_comment_activity(comments, now, 7),
            CommentActivity {
                total_comments: 4,
                period_comments: 2,
            }
        );
    }

    #[test]
    fn regression_summarize_comment_activity_counts_near_future_comments() {
        let now = Utc.with_ymd_and_hms(2026, 7, 4, 0, 0, 0).unwrap();
        let comments = vec![now + Duration::days(1), now + Duration::days(9)];
        let activity = summarize_comment_activity(comments, now, 7);
        assert_eq!(activity.total_comments, 2);
        assert_eq!(activity.period_comments, 1);
    }
}
