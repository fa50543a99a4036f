//! Wall-clock abstraction.
//!
//! The provider reads `now` through a [`Clock`] trait object so tests can
//! pin time and exercise expiration without sleeping.

use chrono::Utc;

/// Source of the current time, in seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    /// Returns the current time as seconds since the Unix epoch.
    fn now_unix(&self) -> u64;
}

/// Production clock backed by the system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        // timestamp() is negative only before 1970; clamp rather than wrap.
        Utc::now().timestamp().max(0) as u64
    }
}
