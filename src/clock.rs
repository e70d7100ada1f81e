use std::cell::Cell;

use chrono::Utc;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// Length of one scheduling day.
pub const DAY_MS: Timestamp = 24 * 60 * 60 * 1000;

/// Source of the current time for the scheduler.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now().timestamp_millis()
    }
}

/// A manually driven clock, for tests and for replaying review logs.
#[derive(Debug, Clone, Default)]
pub struct FixedClock {
    now: Cell<Timestamp>,
}

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }

    pub fn advance(&self, millis: Timestamp) {
        self.now.set(self.now.get().saturating_add(millis));
    }

    pub fn advance_days(&self, days: i64) {
        self.advance(days.saturating_mul(DAY_MS));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
