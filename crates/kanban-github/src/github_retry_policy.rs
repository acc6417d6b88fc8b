use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;

const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);
const MAX_BACKOFF_EXPONENT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Retry budget for GitHub requests that fail transiently.
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms: base_delay_ms.max(1),
        }
    }

    pub fn allows_another_attempt(&self, attempt: usize) -> bool {
        attempt < self.max_attempts
    }

    fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Whether a response with `status` after `attempt` tries is worth repeating.
    pub fn retries_status(&self, attempt: usize, status: StatusCode) -> bool {
        self.allows_another_attempt(attempt)
            && (status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error())
    }

    /// Whether a request that never produced a response is worth repeating.
    pub fn retries_transport_error(&self, attempt: usize, error: &reqwest::Error) -> bool {
        self.allows_another_attempt(attempt)
            && (error.is_timeout() || error.is_connect() || error.is_request())
    }

    /// Delay before the next attempt, always within `[base_delay, 30s]`.
    ///
    /// A server hint replaces exponential backoff.
    pub fn delay_for(&self, attempt: usize, retry_after: Option<Duration>) -> Duration {
        let wanted = retry_after.unwrap_or_else(|| {
            let exponent = u32::try_from(attempt.saturating_sub(1))
                .unwrap_or(u32::MAX)
                .min(MAX_BACKOFF_EXPONENT);
            self.base_delay().saturating_mul(1_u32 << exponent)
        });
        wanted.clamp(self.base_delay().min(MAX_RETRY_DELAY), MAX_RETRY_DELAY)
    }

    /// Reads `Retry-After` as delta seconds or as an HTTP date relative to `now`.
    pub fn retry_after_hint(&self, headers: &HeaderMap, now: DateTime<Utc>) -> Option<Duration> {
        let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
        if let Ok(seconds) = raw.parse::<u64>() {
            return Some(Duration::from_secs(seconds));
        }
        let at = DateTime::parse_from_rfc2822(raw).ok()?.with_timezone(&Utc);
        Some((at - now).to_std().unwrap_or(Duration::ZERO))
    }
}
