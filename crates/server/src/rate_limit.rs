//! Fixed-window admission control
//!
//! One window per key. The whole check-reset-increment step runs under a
//! single mutex, so concurrent callers can never be over-admitted. The guard
//! is a `std::sync::MutexGuard`, which is `!Send` and therefore cannot be held
//! across an `.await` in a handler future.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use summariser_common::RateLimitSettings;

/// Counter state of one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitWindow {
    pub window_start: Instant,
    pub count: u32,
}

impl RateLimitWindow {
    fn expired(&self, now: Instant, period: Duration) -> bool {
        now.saturating_duration_since(self.window_start) >= period
    }
}

/// Fixed-window rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: u32,
    period: Duration,
    windows: Mutex<HashMap<String, RateLimitWindow>>,
}

impl RateLimiter {
    pub fn new(max_calls: u32, period: Duration) -> Self {
        Self {
            max_calls,
            period,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_settings(settings: &RateLimitSettings) -> Self {
        Self::new(settings.max_calls, settings.period())
    }

    pub fn max_calls(&self) -> u32 {
        self.max_calls
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Admit one call for `key`; `false` means the window is exhausted
    pub fn admit(&self, key: &str) -> bool {
        self.try_admit(key).is_ok()
    }

    /// Admit one call for `key`, or return the time left in the current window
    pub fn try_admit(&self, key: &str) -> Result<(), Duration> {
        self.try_admit_at(key, Instant::now())
    }

    pub(crate) fn try_admit_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let mut windows = self.lock();

        let window = windows.entry(key.to_string()).or_insert(RateLimitWindow {
            window_start: now,
            count: 0,
        });

        if window.expired(now, self.period) {
            window.window_start = now;
            window.count = 0;
        }

        if window.count < self.max_calls {
            window.count += 1;
            Ok(())
        } else {
            let elapsed = now.saturating_duration_since(window.window_start);
            Err(self.period.saturating_sub(elapsed))
        }
    }

    /// Calls still available for `key` in its current window
    pub fn remaining(&self, key: &str) -> u32 {
        let now = Instant::now();
        match self.lock().get(key) {
            Some(window) if !window.expired(now, self.period) => {
                self.max_calls.saturating_sub(window.count)
            }
            _ => self.max_calls,
        }
    }

    /// Time left in the current window of `key`, zero once it has expired
    pub fn reset_in(&self, key: &str) -> Duration {
        self.reset_in_at(key, Instant::now())
    }

    pub(crate) fn reset_in_at(&self, key: &str, now: Instant) -> Duration {
        match self.lock().get(key) {
            Some(window) => self
                .period
                .saturating_sub(now.saturating_duration_since(window.window_start)),
            None => Duration::ZERO,
        }
    }

    /// Snapshot of the window for `key`
    pub fn window(&self, key: &str) -> Option<RateLimitWindow> {
        self.lock().get(key).copied()
    }

    // a panic cannot happen between the counter reads and writes, so a
    // poisoned map is still consistent
    fn lock(&self) -> MutexGuard<'_, HashMap<String, RateLimitWindow>> {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_denies_after_max_calls() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        assert!(limiter.admit("summarize"));
        assert!(limiter.admit("summarize"));
        assert!(limiter.admit("summarize"));
        assert!(!limiter.admit("summarize"));
        assert!(!limiter.admit("summarize"));
        assert_eq!(limiter.remaining("summarize"), 0);
    }

    #[test]
    fn test_window_resets_after_period() {
        let period = Duration::from_secs(60);
        let limiter = RateLimiter::new(2, period);
        let t0 = Instant::now();

        assert!(limiter.try_admit_at("k", t0).is_ok());
        assert!(limiter.try_admit_at("k", t0 + Duration::from_secs(1)).is_ok());

        let retry = limiter
            .try_admit_at("k", t0 + Duration::from_secs(15))
            .unwrap_err();
        assert_eq!(retry, Duration::from_secs(45));

        // just before the boundary: still the same window
        assert!(limiter
            .try_admit_at("k", t0 + period - Duration::from_millis(1))
            .is_err());

        let t1 = t0 + period;
        assert!(limiter.try_admit_at("k", t1).is_ok());
        let window = limiter.window("k").unwrap();
        assert_eq!(window.count, 1);
        assert_eq!(window.window_start, t1);
    }

    #[test]
    fn test_reset_in() {
        let period = Duration::from_secs(60);
        let limiter = RateLimiter::new(1, period);
        let t0 = Instant::now();

        assert_eq!(limiter.reset_in_at("k", t0), Duration::ZERO);

        assert!(limiter.try_admit_at("k", t0).is_ok());
        assert_eq!(
            limiter.reset_in_at("k", t0 + Duration::from_secs(20)),
            Duration::from_secs(40)
        );

        // matches the delay reported on denial
        let retry = limiter
            .try_admit_at("k", t0 + Duration::from_secs(20))
            .unwrap_err();
        assert_eq!(retry, limiter.reset_in_at("k", t0 + Duration::from_secs(20)));

        assert_eq!(limiter.reset_in_at("k", t0 + period), Duration::ZERO);
        assert_eq!(
            limiter.reset_in_at("k", t0 + period + Duration::from_secs(5)),
            Duration::ZERO
        );
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.admit("summarize"));
        assert!(!limiter.admit("summarize"));
        assert!(limiter.admit("keypoints"));
        assert_eq!(limiter.remaining("other"), 1);
    }

    #[test]
    fn test_concurrent_admission_is_exact() {
        const THREADS: usize = 64;
        const MAX_CALLS: u32 = 10;

        for _ in 0..20 {
            let limiter = Arc::new(RateLimiter::new(MAX_CALLS, Duration::from_secs(3600)));
            let barrier = Arc::new(Barrier::new(THREADS));

            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    let limiter = Arc::clone(&limiter);
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        barrier.wait();
                        limiter.admit("summarize")
                    })
                })
                .collect();

            let admitted = handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|allowed| *allowed)
                .count();

            assert_eq!(admitted, MAX_CALLS as usize);
            assert_eq!(limiter.window("summarize").unwrap().count, MAX_CALLS);
        }
    }

    #[test]
    fn test_from_settings() {
        let limiter = RateLimiter::from_settings(&RateLimitSettings::default());
        assert_eq!(limiter.max_calls(), 100);
        assert_eq!(limiter.period(), Duration::from_secs(60));
    }
}
