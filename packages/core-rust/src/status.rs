//! Application status vocabulary returned by the network with every response.
//!
//! Every completed call carries exactly one status. [`Status::Ok`] means the
//! node accepted the request, [`Status::Busy`] is transient congestion worth
//! retrying, and everything else is the network's considered judgment about
//! the request and terminates the call.
//!
//! # Wire format
//!
//! Statuses serialize as their stable numeric code so that new codes added
//! on the server side survive a round trip through older clients (they decode
//! as [`Status::Unknown`]).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Application-level outcome of a request, drawn from a fixed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The node accepted the request.
    Ok,
    /// The node is overloaded; the request may succeed if retried.
    Busy,
    /// The transaction body failed validation.
    InvalidTransaction,
    /// A transaction with the same identifier was already submitted.
    DuplicateTransaction,
    /// A required signature was missing or did not verify.
    InvalidSignature,
    /// The offered fee was below the network minimum.
    InsufficientFee,
    /// The payer account cannot cover the transaction fee.
    InsufficientPayerBalance,
    /// The transaction's valid-start window has already closed.
    TransactionExpired,
    /// A referenced account does not exist or is malformed.
    InvalidAccount,
    /// The payer account named in the identifier was not found.
    PayerAccountNotFound,
    /// The node does not support the requested operation.
    NotSupported,
    /// A code outside the known vocabulary, preserved for diagnostics.
    Unknown(u32),
}

impl Status {
    /// Returns the stable numeric code for this status.
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            Self::Ok => 0,
            Self::Busy => 1,
            Self::InvalidTransaction => 2,
            Self::DuplicateTransaction => 3,
            Self::InvalidSignature => 4,
            Self::InsufficientFee => 5,
            Self::InsufficientPayerBalance => 6,
            Self::TransactionExpired => 7,
            Self::InvalidAccount => 8,
            Self::PayerAccountNotFound => 9,
            Self::NotSupported => 10,
            Self::Unknown(code) => code,
        }
    }

    /// Maps a numeric code back to its status.
    ///
    /// Codes outside the known vocabulary map to [`Status::Unknown`] so they
    /// survive decoding unchanged.
    #[must_use]
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::Busy,
            2 => Self::InvalidTransaction,
            3 => Self::DuplicateTransaction,
            4 => Self::InvalidSignature,
            5 => Self::InsufficientFee,
            6 => Self::InsufficientPayerBalance,
            7 => Self::TransactionExpired,
            8 => Self::InvalidAccount,
            9 => Self::PayerAccountNotFound,
            10 => Self::NotSupported,
            other => Self::Unknown(other),
        }
    }

    /// Whether this status reflects transient node congestion worth a retry.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Busy)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "Unknown({code})"),
            other => write!(f, "{other:?}"),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.code())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_code(u32::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_roundtrip_for_known_statuses() {
        let all = [
            Status::Ok,
            Status::Busy,
            Status::InvalidTransaction,
            Status::DuplicateTransaction,
            Status::InvalidSignature,
            Status::InsufficientFee,
            Status::InsufficientPayerBalance,
            Status::TransactionExpired,
            Status::InvalidAccount,
            Status::PayerAccountNotFound,
            Status::NotSupported,
        ];
        for status in all {
            assert_eq!(Status::from_code(status.code()), status);
        }
    }

    #[test]
    fn unknown_codes_survive_roundtrip() {
        let status = Status::from_code(4242);
        assert_eq!(status, Status::Unknown(4242));
        assert_eq!(status.code(), 4242);
    }

    #[test]
    fn only_busy_is_retryable() {
        assert!(Status::Busy.is_retryable());
        assert!(!Status::Ok.is_retryable());
        assert!(!Status::InvalidTransaction.is_retryable());
        assert!(!Status::Unknown(99).is_retryable());
    }

    #[test]
    fn serde_encodes_numeric_code() {
        let bytes = rmp_serde::to_vec_named(&Status::Busy).expect("serialize");
        let code: u32 = rmp_serde::from_slice(&bytes).expect("decode as code");
        assert_eq!(code, 1);

        let decoded: Status = rmp_serde::from_slice(&bytes).expect("deserialize");
        assert_eq!(decoded, Status::Busy);
    }

    #[test]
    fn display_names_the_variant() {
        assert_eq!(Status::Busy.to_string(), "Busy");
        assert_eq!(Status::Unknown(77).to_string(), "Unknown(77)");
    }
}
