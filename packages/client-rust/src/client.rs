//! Client facade tying network, transport, and retry policy together.

use std::fmt;
use std::sync::Arc;

use crate::backoff::Backoff;
use crate::config::ClientConfig;
use crate::execute::{execute, Executable, ExecuteError};
use crate::network::{Network, NetworkError};
use crate::transport::Channel;

/// Handle to the ledger network used to execute operations.
///
/// Owns the node table, the transport channel, and the backoff policy.
/// Cloning is cheap; the shared state sits behind `Arc`s.
#[derive(Clone)]
pub struct Client {
    network: Arc<Network>,
    channel: Arc<dyn Channel>,
    backoff: Backoff,
}

impl Client {
    /// Builds a client for the configured network over the given channel.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] when the configured node set is empty or
    /// contains duplicate ids.
    pub fn for_network(
        config: ClientConfig,
        channel: Arc<dyn Channel>,
    ) -> Result<Self, NetworkError> {
        Ok(Self {
            network: Arc::new(Network::new(config.network)?),
            channel,
            backoff: Backoff::new(config.backoff),
        })
    }

    /// The client's view of the node set.
    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Executes one operation until it reaches a terminal outcome.
    ///
    /// # Errors
    ///
    /// Propagates the engine's terminal error; see [`execute`].
    pub async fn execute<E: Executable>(&self, executable: &E) -> Result<E::Output, ExecuteError> {
        execute(&self.network, self.channel.as_ref(), &self.backoff, executable).await
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("network", &self.network)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}
