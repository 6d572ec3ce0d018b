//! Injectable wall clock.
//!
//! Analytics buckets undated verdicts under "now"; routing that through a
//! trait keeps the aggregation itself deterministic.

use chrono::{DateTime, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn now_epoch_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Returns `None` when `epoch_ms` is outside chrono's range.
    pub fn at_epoch_ms(epoch_ms: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(epoch_ms).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
