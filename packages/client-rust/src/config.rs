//! Client configuration types.

use crate::backoff::BackoffConfig;
use crate::network::NodeId;

/// Top-level configuration for a ledger client.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Node topology the client submits against.
    pub network: NetworkConfig,
    /// Retry backoff policy.
    pub backoff: BackoffConfig,
}

/// The set of addressable consensus nodes.
#[derive(Debug, Clone, Default)]
pub struct NetworkConfig {
    /// Addressable nodes. Order defines the rotation order.
    pub nodes: Vec<NodeEntry>,
}

/// A single addressable node.
#[derive(Debug, Clone)]
pub struct NodeEntry {
    /// The node's identifier, carried in every dispatched attempt.
    pub id: NodeId,
    /// Host and port the transport dials for this node.
    pub address: String,
}
