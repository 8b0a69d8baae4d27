use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::RateLimitConfig;

/// Table size above which expired windows are swept on the next check.
const PURGE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

/// Fixed-window counter keyed by client.
///
/// Each key gets `max_requests` hits per `window`; the window starts at the
/// key's first hit and resets once it has fully elapsed.
#[derive(Debug)]
pub struct FixedWindowRateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowRateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        FixedWindowRateLimiter {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, config.window())
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    /// Counts a hit for `key` at `now`.
    pub fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        // A poisoned lock only means another request panicked mid-update;
        // the counters are still usable.
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        if windows.len() >= PURGE_THRESHOLD {
            let window = self.window;
            let before = windows.len();
            windows.retain(|_, w| now.saturating_duration_since(w.started) < window);
            debug!(purged = before - windows.len(), "Purged expired rate limit windows");
        }

        let entry = windows
            .entry(key.to_string())
            .or_insert(Window { started: now, hits: 0 });

        if now.saturating_duration_since(entry.started) >= self.window {
            *entry = Window { started: now, hits: 0 };
        }

        if entry.hits >= self.max_requests {
            let elapsed = now.saturating_duration_since(entry.started);
            return RateDecision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }

        entry.hits += 1;
        RateDecision::Allowed {
            remaining: self.max_requests - entry.hits,
        }
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
