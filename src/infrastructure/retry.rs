//! Bounded exponential backoff for the static fetch layer

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::config::HttpConfig;

/// Retry schedule: `min * multiplier^(attempt-1)`, clamped to `[min, max]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// Shave up to a quarter off each delay, never below the minimum
    pub jitter: bool,
}

impl BackoffPolicy {
    pub fn from_http_config(config: &HttpConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            min_delay_ms: config.backoff_min_ms,
            max_delay_ms: config.backoff_max_ms,
            backoff_multiplier: 2.0,
            jitter: config.jitter,
        }
    }

    /// Whether another attempt is allowed after `attempt` failed (1-based)
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Wait before the attempt following `attempt` (1-based)
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31) as i32;
        let raw = (self.min_delay_ms as f64 * self.backoff_multiplier.powi(exponent)) as u64;
        let capped = raw.clamp(self.min_delay_ms, self.max_delay_ms.max(self.min_delay_ms));

        let delay = if self.jitter {
            let factor = 0.75 + fastrand::f64() * 0.25;
            ((capped as f64 * factor) as u64).max(self.min_delay_ms)
        } else {
            capped
        };
        Duration::from_millis(delay)
    }

    /// Honour a server supplied `Retry-After`, but never beyond the maximum
    pub fn delay_with_hint(&self, attempt: u32, retry_after_secs: Option<u64>) -> Duration {
        let base = self.delay_after(attempt);
        retry_after_secs.map_or(base, |secs| {
            let hinted = Duration::from_secs(secs).min(Duration::from_millis(self.max_delay_ms));
            base.max(hinted)
        })
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from_http_config(&HttpConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(jitter: bool) -> BackoffPolicy {
        BackoffPolicy {
            max_attempts: 3,
            min_delay_ms: 100,
            max_delay_ms: 1000,
            backoff_multiplier: 2.0,
            jitter,
        }
    }

    #[test]
    fn three_attempts_means_two_retries() {
        let p = policy(false);
        assert!(p.should_retry(1));
        assert!(p.should_retry(2));
        assert!(!p.should_retry(3));
    }

    #[test]
    fn delays_grow_exponentially_until_capped() {
        let p = policy(false);
        assert_eq!(p.delay_after(1), Duration::from_millis(100));
        assert_eq!(p.delay_after(2), Duration::from_millis(200));
        assert_eq!(p.delay_after(3), Duration::from_millis(400));
        assert_eq!(p.delay_after(5), Duration::from_millis(1000));
        assert_eq!(p.delay_after(40), Duration::from_millis(1000));
    }

    #[test]
    fn jittered_delays_stay_within_bounds() {
        let p = policy(true);
        for attempt in 1..10 {
            let d = p.delay_after(attempt);
            assert!(d >= Duration::from_millis(100), "{d:?}");
            assert!(d <= Duration::from_millis(1000), "{d:?}");
        }
    }

    #[test]
    fn retry_after_hint_is_capped() {
        let p = policy(false);
        assert_eq!(p.delay_with_hint(1, Some(60)), Duration::from_millis(1000));
        assert_eq!(p.delay_with_hint(2, None), Duration::from_millis(200));
    }
}
