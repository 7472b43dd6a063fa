//! Fixed-window request counters keyed by client.
//!
//! Each key owns one bucket holding a request count and the instant its
//! window closes. A request past that instant starts a fresh window. Bursts
//! of up to twice the limit are possible across a window boundary.

use std::time::{ Duration, Instant };

use dashmap::DashMap;
use log::debug;

#[derive(Debug, Clone, Copy)]
struct Bucket {
    count: u32,
    reset_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at: Option<Instant>,
}

impl RateDecision {
    /// Time left until the window closes, measured from `now`.
    pub fn retry_after(&self, now: Instant) -> Option<Duration> {
        self.reset_at.map(|reset_at| reset_at.saturating_duration_since(now))
    }
}

#[derive(Debug, Default)]
pub struct FixedWindowLimiter {
    buckets: DashMap<String, Bucket>,
}

impl FixedWindowLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self, key: &str, limit: u32, window: Duration) -> RateDecision {
        self.check_at(key, limit, window, Instant::now())
    }

    /// Same as [`check`](Self::check) with an explicit clock reading.
    pub fn check_at(&self, key: &str, limit: u32, window: Duration, now: Instant) -> RateDecision {
        // The entry guard keeps the shard locked for the whole read-compare-increment.
        let mut entry = self.buckets.entry(key.to_string()).or_insert(Bucket {
            count: 0,
            reset_at: now,
        });
        let bucket = entry.value_mut();

        if bucket.count == 0 || now > bucket.reset_at {
            *bucket = Bucket {
                count: 1,
                reset_at: now + window,
            };
            return RateDecision {
                allowed: true,
                remaining: limit.saturating_sub(1),
                reset_at: Some(bucket.reset_at),
            };
        }

        if bucket.count >= limit {
            debug!("Rate limit hit for '{}' ({} per {:?})", key, limit, window);
            return RateDecision {
                allowed: false,
                remaining: 0,
                reset_at: Some(bucket.reset_at),
            };
        }

        bucket.count += 1;
        RateDecision {
            allowed: true,
            remaining: limit - bucket.count,
            reset_at: Some(bucket.reset_at),
        }
    }

    /// Drops buckets whose window already closed. They would be reset on next use anyway.
    pub fn prune_expired(&self, now: Instant) -> usize {
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| now <= bucket.reset_at);
        before.saturating_sub(self.buckets.len())
    }

    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn denies_the_request_after_the_limit() {
        let limiter = FixedWindowLimiter::new();
        let start = Instant::now();

        for expected_remaining in [2, 1, 0] {
            let decision = limiter.check_at("1.2.3.4", 3, MINUTE, start);
            assert!(decision.allowed);
            assert_eq!(decision.remaining, expected_remaining);
        }

        let denied = limiter.check_at("1.2.3.4", 3, MINUTE, start + Duration::from_secs(1));
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.reset_at, Some(start + MINUTE));
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = FixedWindowLimiter::new();
        let start = Instant::now();

        assert!(limiter.check_at("a", 1, MINUTE, start).allowed);
        assert!(!limiter.check_at("a", 1, MINUTE, start + MINUTE).allowed);

        let later = start + MINUTE + Duration::from_millis(1);
        let decision = limiter.check_at("a", 1, MINUTE, later);
        assert!(decision.allowed);
        assert_eq!(decision.reset_at, Some(later + MINUTE));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = FixedWindowLimiter::new();
        let now = Instant::now();

        assert!(limiter.check_at("a", 1, MINUTE, now).allowed);
        assert!(!limiter.check_at("a", 1, MINUTE, now).allowed);
        assert!(limiter.check_at("b", 1, MINUTE, now).allowed);
    }

    #[test]
    fn retry_after_counts_down_to_reset() {
        let limiter = FixedWindowLimiter::new();
        let start = Instant::now();
        limiter.check_at("a", 1, MINUTE, start);

        let denied = limiter.check_at("a", 1, MINUTE, start + Duration::from_secs(45));
        assert_eq!(
            denied.retry_after(start + Duration::from_secs(45)),
            Some(Duration::from_secs(15))
        );
    }

    #[test]
    fn concurrent_callers_never_exceed_the_limit() {
        let limiter = Arc::new(FixedWindowLimiter::new());
        let now = Instant::now();

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let limiter = limiter.clone();
                thread::spawn(move || limiter.check_at("shared", 25, MINUTE, now).allowed)
            })
            .collect();

        let allowed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|allowed| *allowed)
            .count();

        assert_eq!(allowed, 25);
    }

    #[test]
    fn prune_only_removes_closed_windows() {
        let limiter = FixedWindowLimiter::new();
        let start = Instant::now();

        limiter.check_at("old", 5, MINUTE, start);
        limiter.check_at("new", 5, MINUTE, start + MINUTE);

        let removed = limiter.prune_expired(start + MINUTE + Duration::from_secs(1));
        assert_eq!(removed, 1);
        assert_eq!(limiter.tracked_keys(), 1);
    }
}
