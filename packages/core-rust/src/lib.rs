//! Meridian Core — transaction identifiers, status vocabulary, and wire types.

pub mod account;
pub mod status;
pub mod timestamp;
pub mod transaction_id;

pub use account::AccountId;
pub use status::Status;
pub use timestamp::{ClockSource, SystemClock, Timestamp};
pub use transaction_id::{TransactionId, ValidStartGenerator, WireError};

#[cfg(test)]
mod tests {
    #[test]
    fn crate_loads() {
        // Empty body: if this test runs, the crate compiles and loads.
    }
}
