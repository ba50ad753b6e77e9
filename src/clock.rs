//! Time source for session timeouts and history timestamps.

use chrono::{Duration, Local, NaiveDateTime};
use std::cell::Cell;

/// Source of the current local date and time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
///
/// Used to drive session expiry and history ordering deterministically.
#[derive(Debug)]
pub struct ManualClock {
    current: Cell<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        ManualClock {
            current: Cell::new(start),
        }
    }

    /// Moves the clock forward by `secs` seconds.
    pub fn advance_secs(&self, secs: i64) {
        self.current.set(self.current.get() + Duration::seconds(secs));
    }

    pub fn set(&self, at: NaiveDateTime) {
        self.current.set(at);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.current.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(start());
        assert_eq!(clock.now(), start());

        clock.advance_secs(121);
        assert_eq!(clock.now().format("%H:%M:%S").to_string(), "09:02:01");
    }

    #[test]
    fn test_manual_clock_set() {
        let clock = ManualClock::new(start());
        let later = start() + Duration::hours(5);
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
