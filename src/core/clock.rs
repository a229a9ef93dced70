//! Wall-clock time sources.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

/// Provides the current wall-clock time.
///
/// Sessions are timestamped and measured through this trait so tests can
/// control time without sleeping.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The local calendar date of the current instant.
    fn today(&self) -> NaiveDate {
        local_date(self.now())
    }
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    #[must_use]
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock to `at`.
    pub fn set(&self, at: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *now = at;
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// The local calendar date a timestamp falls on.
#[must_use]
pub fn local_date(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advance() {
        let start = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::seconds(1500));
        assert_eq!(clock.now(), start + Duration::minutes(25));
    }

    #[test]
    fn test_manual_clock_set() {
        let start = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.set(later);
        assert_eq!(clock.now(), later);
        assert_eq!(clock.today(), local_date(later));
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
