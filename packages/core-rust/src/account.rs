//! Account references.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a ledger account, addressed as `shard.realm.num`.
///
/// The account that pays a transaction's fees is half of its identifier; the
/// network also uses account references to address individual consensus
/// nodes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AccountId {
    /// Shard the account lives in.
    pub shard: u64,
    /// Realm within the shard.
    pub realm: u64,
    /// Account number within the realm.
    pub num: u64,
}

impl AccountId {
    /// Creates an account reference in the default shard and realm (`0.0.num`).
    #[must_use]
    pub fn new(num: u64) -> Self {
        Self {
            shard: 0,
            realm: 0,
            num,
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}
