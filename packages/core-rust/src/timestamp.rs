//! Wall-clock instants with second and sub-second precision.
//!
//! [`Timestamp`] is the ledger's `(seconds, nanos)` instant representation,
//! used as the `valid_start` of transaction identifiers. The [`ClockSource`]
//! trait abstracts the system clock so identifier generation can be tested
//! against deterministic clocks.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Number of nanoseconds in one second.
pub const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// An instant with second and sub-second precision.
///
/// Ordering is seconds first, then nanos (the derived `Ord` relies on field
/// declaration order). `nanos` is always below [`NANOS_PER_SECOND`]; the
/// arithmetic helpers maintain that invariant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp {
    /// Whole seconds since the Unix epoch.
    pub seconds: i64,
    /// Nanoseconds within the second. Always `< 1_000_000_000`.
    pub nanos: u32,
}

impl Timestamp {
    /// Creates a timestamp, carrying any nanosecond overflow into seconds.
    #[must_use]
    pub fn new(seconds: i64, nanos: u32) -> Self {
        Self {
            seconds: seconds + i64::from(nanos / NANOS_PER_SECOND),
            nanos: nanos % NANOS_PER_SECOND,
        }
    }

    /// Returns this instant moved back by whole seconds.
    #[must_use]
    pub fn minus_seconds(self, seconds: i64) -> Self {
        Self {
            seconds: self.seconds - seconds,
            nanos: self.nanos,
        }
    }

    /// Returns this instant advanced by the given nanoseconds, carrying
    /// overflow into the seconds field.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn plus_nanos(self, nanos: u32) -> Self {
        let total = u64::from(self.nanos) + u64::from(nanos);
        Self {
            seconds: self.seconds + (total / u64::from(NANOS_PER_SECOND)) as i64,
            nanos: (total % u64::from(NANOS_PER_SECOND)) as u32,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.seconds, self.nanos)
    }
}

/// Abstraction over the system clock for dependency injection.
///
/// Allows deterministic testing by replacing the real clock with a scripted
/// one. The default implementation ([`SystemClock`]) delegates to
/// `std::time::SystemTime`.
pub trait ClockSource: Send + Sync {
    /// Returns the current wall-clock time.
    fn now(&self) -> Timestamp;
}

/// Default clock source that reads the real system time.
#[derive(Debug, Clone)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    #[allow(clippy::cast_possible_wrap)]
    fn now(&self) -> Timestamp {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is before Unix epoch");
        Timestamp {
            seconds: elapsed.as_secs() as i64,
            nanos: elapsed.subsec_nanos(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_seconds_first() {
        let a = Timestamp { seconds: 100, nanos: 999_999_999 };
        let b = Timestamp { seconds: 101, nanos: 0 };
        assert!(a < b);
    }

    #[test]
    fn ordering_nanos_second() {
        let a = Timestamp { seconds: 100, nanos: 1 };
        let b = Timestamp { seconds: 100, nanos: 2 };
        assert!(a < b);
    }

    #[test]
    fn new_carries_nanosecond_overflow() {
        let ts = Timestamp::new(10, NANOS_PER_SECOND + 5);
        assert_eq!(ts, Timestamp { seconds: 11, nanos: 5 });
    }

    #[test]
    fn plus_nanos_without_carry() {
        let ts = Timestamp { seconds: 100, nanos: 40 }.plus_nanos(2);
        assert_eq!(ts, Timestamp { seconds: 100, nanos: 42 });
    }

    #[test]
    fn plus_nanos_carries_into_seconds() {
        let ts = Timestamp { seconds: 100, nanos: NANOS_PER_SECOND - 1 }.plus_nanos(1);
        assert_eq!(ts, Timestamp { seconds: 101, nanos: 0 });
    }

    #[test]
    fn minus_seconds_keeps_nanos() {
        let ts = Timestamp { seconds: 100, nanos: 7 }.minus_seconds(10);
        assert_eq!(ts, Timestamp { seconds: 90, nanos: 7 });
    }

    #[test]
    fn display_renders_seconds_dot_nanos() {
        let ts = Timestamp { seconds: 1_700_000_000, nanos: 42 };
        assert_eq!(ts.to_string(), "1700000000.42");
    }

    #[test]
    fn system_clock_returns_nonzero() {
        let now = SystemClock.now();
        assert!(now.seconds > 0);
    }

    #[test]
    fn serde_roundtrip() {
        let ts = Timestamp { seconds: 1_700_000_000, nanos: 123_456_789 };
        let bytes = rmp_serde::to_vec_named(&ts).expect("serialize");
        let decoded: Timestamp = rmp_serde::from_slice(&bytes).expect("deserialize");
        assert_eq!(ts, decoded);
    }
}
