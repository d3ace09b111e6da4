//! The client's view of the addressable node set.
//!
//! A [`Network`] is an immutable node table plus a lock-free rotation cursor,
//! so concurrent calls can spread attempts across nodes without contention.
//! The execution engine only reads from it; nothing here mutates after
//! construction.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::{NetworkConfig, NodeEntry};

/// Unique identifier for a consensus node within the client's network view.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from validating a network configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("network configuration contains no nodes")]
    NoNodes,
    #[error("duplicate node id {0} in network configuration")]
    DuplicateNode(NodeId),
}

/// Immutable node table with round-robin selection.
#[derive(Debug)]
pub struct Network {
    nodes: Vec<NodeEntry>,
    cursor: AtomicUsize,
}

impl Network {
    /// Builds a network view from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::NoNodes`] for an empty node set (every call
    /// needs at least one addressable node) and
    /// [`NetworkError::DuplicateNode`] when two entries share an id.
    pub fn new(config: NetworkConfig) -> Result<Self, NetworkError> {
        if config.nodes.is_empty() {
            return Err(NetworkError::NoNodes);
        }
        let mut seen = HashSet::new();
        for entry in &config.nodes {
            if !seen.insert(entry.id) {
                return Err(NetworkError::DuplicateNode(entry.id));
            }
        }
        Ok(Self {
            nodes: config.nodes,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Selects the next node in rotation order, wrapping around.
    ///
    /// Lock-free: concurrent callers each receive a node, advancing a shared
    /// cursor.
    pub fn next_node(&self) -> NodeId {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.nodes.len();
        self.nodes[index].id
    }

    /// Looks up the address of a node.
    #[must_use]
    pub fn address(&self, id: NodeId) -> Option<&str> {
        self.nodes
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.address.as_str())
    }

    /// Returns all node ids in rotation order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|entry| entry.id).collect()
    }

    /// Returns the number of nodes in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the view contains no nodes. Never true for a
    /// constructed `Network`; present for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
