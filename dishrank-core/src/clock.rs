//! Time source abstraction so day-key resolution can be driven in tests.

use crate::Timestamp;
use chrono::{Duration, Utc};
use std::sync::RwLock;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    pub fn set(&self, instant: Timestamp) {
        match self.now.write() {
            Ok(mut guard) => *guard = instant,
            Err(poisoned) => *poisoned.into_inner() = instant,
        }
    }

    pub fn advance(&self, by: Duration) {
        match self.now.write() {
            Ok(mut guard) => *guard += by,
            Err(poisoned) => *poisoned.into_inner() += by,
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        match self.now.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_set_and_advance() {
        let start = Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::hours(3));
        assert_eq!(clock.now(), start + Duration::hours(3));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
