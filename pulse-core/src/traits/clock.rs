//! IClock — injected wall clock.

use chrono::{DateTime, Utc};

/// Source of "now". Membership expiry and calendar-day normalization
/// must read the clock through this seam so tests can pin time.
pub trait IClock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl IClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
