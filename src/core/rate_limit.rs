//! Sliding-window rate limiting for enquiry submissions.
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_attempts: usize,
    pub window_secs: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        RateLimitConfig {
            max_attempts: 5,
            window_secs: 60,
        }
    }
}

/// Allows at most `max_attempts` per identifier within a trailing window.
#[derive(Debug)]
pub struct RateLimiter {
    max_attempts: usize,
    window: Duration,
    attempts: HashMap<String, Vec<DateTime<Utc>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        RateLimiter {
            max_attempts: config.max_attempts,
            window: Duration::try_seconds(config.window_secs.max(0)).unwrap_or(Duration::MAX),
            attempts: HashMap::new(),
        }
    }

    fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Records an attempt at the current time if allowed.
    pub fn check(&mut self, identifier: &str) -> bool {
        self.check_at(identifier, Utc::now())
    }

    /// Records an attempt at `now` if the identifier still has capacity in
    /// the window ending at `now`. Rejected attempts are not recorded.
    pub fn check_at(&mut self, identifier: &str, now: DateTime<Utc>) -> bool {
        let window_start = self.window_start(now);
        let attempts = self.attempts.entry(identifier.to_string()).or_default();
        attempts.retain(|t| *t > window_start);

        if attempts.len() >= self.max_attempts {
            debug!("Rate limit reached for {identifier}");
            return false;
        }
        attempts.push(now);
        true
    }

    /// Attempts left for `identifier` in the window ending at `now`.
    pub fn remaining_at(&self, identifier: &str, now: DateTime<Utc>) -> usize {
        let window_start = self.window_start(now);
        let recent = self
            .attempts
            .get(identifier)
            .map_or(0, |a| a.iter().filter(|t| **t > window_start).count());
        self.max_attempts.saturating_sub(recent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_blocks_after_max_attempts() {
        let mut limiter = RateLimiter::new(RateLimitConfig {
            max_attempts: 3,
            window_secs: 60,
        });
        assert!(limiter.check_at("a@example.com", at(0)));
        assert!(limiter.check_at("a@example.com", at(1)));
        assert!(limiter.check_at("a@example.com", at(2)));
        assert!(!limiter.check_at("a@example.com", at(3)));
        assert_eq!(limiter.remaining_at("a@example.com", at(3)), 0);

        // Other identifiers are independent
        assert!(limiter.check_at("b@example.com", at(3)));
    }

    #[test]
    fn test_window_expiry_frees_attempts() {
        let mut limiter = RateLimiter::new(RateLimitConfig {
            max_attempts: 2,
            window_secs: 60,
        });
        assert!(limiter.check_at("id", at(0)));
        assert!(limiter.check_at("id", at(30)));
        assert!(!limiter.check_at("id", at(59)));
        assert_eq!(limiter.remaining_at("id", at(60)), 1);
        assert!(limiter.check_at("id", at(61)));
        assert!(!limiter.check_at("id", at(62)));
    }

    #[test]
    fn test_remaining_for_unknown_identifier() {
        let limiter = RateLimiter::new(RateLimitConfig::default());
        assert_eq!(limiter.remaining_at("nobody", at(0)), 5);
    }
}
