//! Test clock — deterministic `Clock` implementation for tests.

use chrono::{DateTime, TimeZone, Utc};
use eventide_core::clock::Clock;

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// A clock pinned to `2025-05-10T01:02:03Z`.
    ///
    /// # Panics
    ///
    /// Never in practice; the timestamp is a valid constant.
    #[must_use]
    pub fn standard() -> Self {
        Self(Utc.with_ymd_and_hms(2025, 5, 10, 1, 2, 3).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
