//! Wall-clock source used for report timestamps and streak days.
//!
//! The countdown itself never reads the wall clock; it only counts ticks.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Source of "now", swappable for a fixed instant in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeSource {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl TimeSource {
    /// A time source fixed at the given instant.
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Current instant according to this source.
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            TimeSource::System => Utc::now(),
            TimeSource::Fixed(t) => *t,
        }
    }

    /// Current UTC calendar day.
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Move a fixed source forward. No effect on `System`.
    pub fn advance(&mut self, delta: Duration) {
        if let TimeSource::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
#[cfg(any(test, feature = "test-util"))]
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// A deterministic `DateTime<Utc>` for tests, paired with [`TimeSource::Fixed`].
///
/// Only built for this crate's tests or with the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_source_advances_by_days() {
        let mut source = TimeSource::fixed(fixed_now());
        let day = source.today();
        source.advance(Duration::days(1));
        assert_eq!(source.today(), day.succ_opt().unwrap());
    }

    #[test]
    fn system_source_ignores_advance() {
        let mut source = TimeSource::System;
        source.advance(Duration::days(3));
        assert_eq!(source, TimeSource::System);
    }
}
