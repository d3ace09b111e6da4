//! Client-generated transaction identifiers.
//!
//! A [`TransactionId`] pairs the fee-paying account with the transaction's
//! `valid_start` instant. The network uses it to deduplicate and order
//! submissions; clients keep it as the correlation key for fetching receipts
//! and records after consensus.
//!
//! Generation is process-wide monotonic: every identifier's `valid_start` is
//! strictly greater than the previous one, no matter how many callers race
//! or what the wall clock does in between.
//!
//! # Wire format
//!
//! Identifiers encode to a flat `(accountId, seconds, nanos)` MsgPack map via
//! `rmp_serde::to_vec_named()` and round-trip losslessly through
//! [`TransactionId::to_bytes`] / [`TransactionId::from_bytes`]. The
//! `Display` form `<account>@<seconds>.<nanos>` is for logs only and is not
//! machine-parseable.

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::timestamp::{ClockSource, SystemClock, Timestamp};

/// How far behind the wall clock a generated `valid_start` is placed.
///
/// A submission stays acceptable as long as the receiving node's clock is no
/// more than this many seconds behind ours.
const CLOCK_SKEW_SECONDS: i64 = 10;

/// Last `valid_start` issued anywhere in this process.
static LAST_VALID_START: Mutex<Option<Timestamp>> = Mutex::new(None);

// ---------------------------------------------------------------------------
// TransactionId
// ---------------------------------------------------------------------------

/// The client-generated identifier for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId {
    /// The account that pays this transaction's fees.
    pub account_id: AccountId,
    /// The start of the window in which the network may process the
    /// transaction.
    pub valid_start: Timestamp,
}

impl TransactionId {
    /// Generates a new identifier for the given payer account.
    ///
    /// `valid_start` values are strictly increasing across all callers in
    /// the process, even when two calls land in the same clock tick or the
    /// wall clock moves backward.
    #[must_use]
    pub fn generate(account_id: AccountId) -> Self {
        let mut last = LAST_VALID_START.lock();
        let valid_start = advance(&mut *last, SystemClock.now());
        Self {
            account_id,
            valid_start,
        }
    }

    /// Encodes this identifier to its wire layout.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Encode`] if MsgPack encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        let wire = TransactionIdWire {
            account_id: self.account_id,
            seconds: self.valid_start.seconds,
            nanos: self.valid_start.nanos,
        };
        Ok(rmp_serde::to_vec_named(&wire)?)
    }

    /// Decodes an identifier from its wire layout.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Decode`] if the bytes are not a valid encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        let wire: TransactionIdWire = rmp_serde::from_slice(bytes)?;
        Ok(Self {
            account_id: wire.account_id,
            valid_start: Timestamp::new(wire.seconds, wire.nanos),
        })
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.account_id, self.valid_start)
    }
}

/// Flat wire layout of a transaction identifier.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionIdWire {
    account_id: AccountId,
    seconds: i64,
    nanos: u32,
}

/// Errors from encoding or decoding a transaction identifier.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("failed to encode transaction id: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("failed to decode transaction id: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Issues strictly increasing `valid_start` instants from an injected clock.
///
/// [`TransactionId::generate`] runs this algorithm against the real system
/// clock and a process-wide watermark. Tests construct their own generator
/// with a deterministic clock to exercise clock stalls and reversals.
pub struct ValidStartGenerator {
    last: Mutex<Option<Timestamp>>,
    clock: Box<dyn ClockSource>,
}

impl ValidStartGenerator {
    /// Creates a generator reading time from the given clock.
    #[must_use]
    pub fn new(clock: Box<dyn ClockSource>) -> Self {
        Self {
            last: Mutex::new(None),
            clock,
        }
    }

    /// Generates a new identifier for the given payer account.
    pub fn generate(&self, account_id: AccountId) -> TransactionId {
        let mut last = self.last.lock();
        let valid_start = advance(&mut *last, self.clock.now());
        TransactionId {
            account_id,
            valid_start,
        }
    }
}

/// Computes the next `valid_start` and stores it as the new watermark.
///
/// Must run with the watermark lock held: read, compute, and write are one
/// critical section. The candidate sits `CLOCK_SKEW_SECONDS` behind the
/// observed clock; when the candidate does not beat the watermark (same tick,
/// stalled or backward clock) the watermark advances by a single nanosecond
/// instead.
fn advance(last: &mut Option<Timestamp>, now: Timestamp) -> Timestamp {
    let candidate = now.minus_seconds(CLOCK_SKEW_SECONDS);
    let next = match *last {
        Some(prev) if candidate <= prev => {
            tracing::trace!(%prev, %candidate, "clock did not advance, bumping watermark");
            prev.plus_nanos(1)
        }
        _ => candidate,
    };
    *last = Some(next);
    next
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::collections::VecDeque;
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::timestamp::NANOS_PER_SECOND;

    /// Clock that always reports the same instant.
    struct FrozenClock(Timestamp);

    impl ClockSource for FrozenClock {
        fn now(&self) -> Timestamp {
            self.0
        }
    }

    /// Clock that replays a scripted sequence of observations, then repeats
    /// the final one.
    struct ScriptedClock {
        times: Mutex<VecDeque<Timestamp>>,
        fallback: Timestamp,
    }

    impl ScriptedClock {
        fn new(times: Vec<Timestamp>) -> Self {
            let fallback = *times.last().expect("at least one observation");
            Self {
                times: Mutex::new(times.into()),
                fallback,
            }
        }
    }

    impl ClockSource for ScriptedClock {
        fn now(&self) -> Timestamp {
            self.times.lock().pop_front().unwrap_or(self.fallback)
        }
    }

    fn ts(seconds: i64, nanos: u32) -> Timestamp {
        Timestamp { seconds, nanos }
    }

    #[test]
    fn first_id_is_clamped_ten_seconds_behind() {
        let generator = ValidStartGenerator::new(Box::new(FrozenClock(ts(1000, 500))));
        let id = generator.generate(AccountId::new(2));
        assert_eq!(id.valid_start, ts(990, 500));
    }

    #[test]
    fn same_tick_calls_advance_by_one_nanosecond() {
        let generator = ValidStartGenerator::new(Box::new(FrozenClock(ts(1000, 0))));
        let first = generator.generate(AccountId::new(2));
        let second = generator.generate(AccountId::new(2));
        let third = generator.generate(AccountId::new(2));

        assert_eq!(second.valid_start, first.valid_start.plus_nanos(1));
        assert_eq!(third.valid_start, second.valid_start.plus_nanos(1));
    }

    #[test]
    fn backward_clock_still_increases() {
        let generator = ValidStartGenerator::new(Box::new(ScriptedClock::new(vec![
            ts(1000, 0),
            ts(900, 0), // clock jumps back 100s
            ts(901, 0),
        ])));
        let a = generator.generate(AccountId::new(2));
        let b = generator.generate(AccountId::new(2));
        let c = generator.generate(AccountId::new(2));

        assert!(b.valid_start > a.valid_start);
        assert!(c.valid_start > b.valid_start);
    }

    #[test]
    fn advancing_clock_uses_fresh_candidate() {
        let generator = ValidStartGenerator::new(Box::new(ScriptedClock::new(vec![
            ts(1000, 0),
            ts(1005, 250),
        ])));
        let first = generator.generate(AccountId::new(2));
        let second = generator.generate(AccountId::new(2));

        assert_eq!(first.valid_start, ts(990, 0));
        assert_eq!(second.valid_start, ts(995, 250));
    }

    #[test]
    fn valid_start_stays_within_skew_window() {
        // Even after many same-tick calls, valid_start remains inside
        // [now - 11s, now].
        let now = ts(5000, 0);
        let generator = ValidStartGenerator::new(Box::new(FrozenClock(now)));
        for _ in 0..100 {
            let id = generator.generate(AccountId::new(2));
            assert!(id.valid_start <= now);
            assert!(id.valid_start >= now.minus_seconds(11));
        }
    }

    #[test]
    fn nanosecond_bump_carries_across_second_boundary() {
        let generator = ValidStartGenerator::new(Box::new(FrozenClock(ts(
            1000,
            NANOS_PER_SECOND - 1,
        ))));
        let first = generator.generate(AccountId::new(2));
        let second = generator.generate(AccountId::new(2));

        assert_eq!(first.valid_start, ts(990, NANOS_PER_SECOND - 1));
        assert_eq!(second.valid_start, ts(991, 0));
    }

    #[test]
    fn concurrent_generation_is_unique_and_per_thread_increasing() {
        let generator = Arc::new(ValidStartGenerator::new(Box::new(SystemClock)));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let generator = Arc::clone(&generator);
            handles.push(std::thread::spawn(move || {
                (0..200)
                    .map(|_| generator.generate(AccountId::new(2)).valid_start)
                    .collect::<Vec<_>>()
            }));
        }

        let mut all = HashSet::new();
        for handle in handles {
            let issued = handle.join().expect("generator thread panicked");
            for pair in issued.windows(2) {
                assert!(pair[1] > pair[0], "per-thread sequence must increase");
            }
            all.extend(issued);
        }
        assert_eq!(all.len(), 8 * 200, "all issued instants must be unique");
    }

    #[test]
    fn process_wide_generate_is_strictly_increasing() {
        let first = TransactionId::generate(AccountId::new(2));
        let second = TransactionId::generate(AccountId::new(2));
        assert!(second.valid_start > first.valid_start);
        assert_eq!(first.account_id, AccountId::new(2));
    }

    #[test]
    fn wire_roundtrip() {
        let id = TransactionId {
            account_id: AccountId { shard: 1, realm: 2, num: 3 },
            valid_start: ts(1_700_000_000, 123_456_789),
        };
        let bytes = id.to_bytes().expect("encode");
        let decoded = TransactionId::from_bytes(&bytes).expect("decode");
        assert_eq!(id, decoded);
    }

    #[test]
    fn from_bytes_rejects_garbage() {
        let err = TransactionId::from_bytes(&[0xc1, 0x00, 0xff]).unwrap_err();
        assert!(matches!(err, WireError::Decode(_)));
    }

    #[test]
    fn display_renders_account_at_instant() {
        let id = TransactionId {
            account_id: AccountId::new(1001),
            valid_start: ts(1_700_000_000, 42),
        };
        assert_eq!(id.to_string(), "0.0.1001@1700000000.42");
    }

    proptest! {
        /// Whatever the clock reports, issued instants strictly increase.
        #[test]
        fn issued_instants_strictly_increase(
            observations in prop::collection::vec(
                (any::<i32>(), 0u32..NANOS_PER_SECOND),
                1..64,
            )
        ) {
            let times: Vec<Timestamp> = observations
                .into_iter()
                .map(|(seconds, nanos)| ts(i64::from(seconds), nanos))
                .collect();
            let count = times.len();
            let generator = ValidStartGenerator::new(Box::new(ScriptedClock::new(times)));

            let mut prev: Option<Timestamp> = None;
            for _ in 0..count {
                let issued = generator.generate(AccountId::new(2)).valid_start;
                if let Some(prev) = prev {
                    prop_assert!(issued > prev);
                }
                prev = Some(issued);
            }
        }
    }
}
