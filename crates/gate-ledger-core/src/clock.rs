//! Time source for gate timestamps

use chrono::{Local, NaiveDateTime};
use std::sync::atomic::{AtomicI64, Ordering};

/// Supplies the wall-clock time stamped onto records
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Manually advanced clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    /// Seconds since the Unix epoch
    secs: AtomicI64,
}

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self {
            secs: AtomicI64::new(at.and_utc().timestamp()),
        }
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.secs.fetch_add(minutes * 60, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        chrono::DateTime::from_timestamp(self.secs.load(Ordering::SeqCst), 0)
            .map(|dt| dt.naive_utc())
            .unwrap_or_default()
    }
}
