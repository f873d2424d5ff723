// ============================
// crates/core/src/auth/rate_limit.rs
// ============================
//! Rate limiting for authentication attempts.
//!
//! A fixed window opens on the first attempt for a key and is replaced
//! wholesale once it has elapsed. This is a client-side guard against retry
//! storms, not a security boundary.

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use moodlog_common::RateLimitDecision;
use std::time::Duration;

use crate::config::RateLimitSettings;

/// Default number of attempts allowed per window
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default window length (15 minutes)
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);

pub const PASSWORD_RESET_MAX_ATTEMPTS: u32 = 3;

/// Password reset window (1 hour)
pub const PASSWORD_RESET_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Entry in the rate limit map
#[derive(Debug, Clone, Copy)]
struct RateLimitRecord {
    /// Attempts observed in the current window, always >= 1
    count: u32,
    /// Time of the first attempt in the window
    window_start: DateTime<Utc>,
}

impl RateLimitRecord {
    fn opened_at(now: DateTime<Utc>) -> Self {
        Self {
            count: 1,
            window_start: now,
        }
    }
}

/// Per-key attempt counter over a fixed window
#[derive(Debug)]
pub struct RateLimiter {
    /// Records keyed by identifier (normalized email)
    records: DashMap<String, RateLimitRecord>,
    /// Maximum number of attempts per window
    max_attempts: u32,
    /// Window length
    window: TimeDelta,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW)
    }
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            records: DashMap::new(),
            max_attempts,
            window: TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Limiter with the password-reset policy (3 per hour)
    pub fn password_reset() -> Self {
        Self::new(PASSWORD_RESET_MAX_ATTEMPTS, PASSWORD_RESET_WINDOW)
    }

    pub fn from_settings(settings: &RateLimitSettings) -> Self {
        Self::new(
            settings.max_attempts,
            Duration::from_secs(settings.window_secs),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn window(&self) -> TimeDelta {
        self.window
    }

    /// Count an attempt for `key` and decide whether it may proceed
    pub fn check_limit(&self, key: &str) -> RateLimitDecision {
        self.check_limit_at(key, Utc::now())
    }

    /// Same as [`check_limit`](Self::check_limit) against an explicit clock reading.
    ///
    /// The call that opens a window is always allowed, even when
    /// `max_attempts` is 0. A denied attempt does not advance the counter.
    pub fn check_limit_at(&self, key: &str, now: DateTime<Utc>) -> RateLimitDecision {
        // The entry guard holds the shard lock, so check-and-update is atomic per key
        match self.records.entry(key.to_owned()) {
            Entry::Vacant(vacant) => {
                vacant.insert(RateLimitRecord::opened_at(now));
                self.window_opened()
            },
            Entry::Occupied(mut occupied) => {
                let record = occupied.get_mut();

                if now - record.window_start > self.window {
                    *record = RateLimitRecord::opened_at(now);
                    return self.window_opened();
                }

                if record.count >= self.max_attempts {
                    let reset_time = record
                        .window_start
                        .checked_add_signed(self.window)
                        .unwrap_or(DateTime::<Utc>::MAX_UTC);
                    return RateLimitDecision::denied(reset_time);
                }

                record.count += 1;
                RateLimitDecision::allowed(self.max_attempts - record.count)
            },
        }
    }

    fn window_opened(&self) -> RateLimitDecision {
        RateLimitDecision::allowed(self.max_attempts.saturating_sub(1))
    }

    /// Forget `key`, re-arming its full quota
    pub fn reset(&self, key: &str) {
        self.records.remove(key);
    }

    /// Drop records whose window has elapsed. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now())
    }

    pub fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.records.len();
        self.records
            .retain(|_, record| now - record.window_start <= self.window);
        before.saturating_sub(self.records.len())
    }

    /// Number of keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.records.len()
    }
}
