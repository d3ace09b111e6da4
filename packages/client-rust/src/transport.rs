//! Transport capability handed to the execution engine.
//!
//! The engine never opens connections itself. It is handed a [`Channel`]
//! that can perform one unary call against a named node; connection pooling,
//! TLS, and wire framing live behind that trait. Transport failures carry
//! their own retryability classification: transient unreachability and
//! remote overload are retried, everything else fails the call immediately.

use std::fmt;

use async_trait::async_trait;

use crate::network::NodeId;

/// Identifies a remote procedure on the ledger service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RemoteMethod {
    /// Fully qualified service name.
    pub service: &'static str,
    /// Method name within the service.
    pub method: &'static str,
}

impl RemoteMethod {
    /// Renders the wire path `/{service}/{method}`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}/{}", self.service, self.method)
    }
}

impl fmt::Display for RemoteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.service, self.method)
    }
}

/// Errors raised by the transport layer when a call does not complete.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The target node could not be reached.
    #[error("node unavailable: {detail}")]
    Unavailable { detail: String },
    /// The remote side ran out of capacity for the call.
    #[error("remote resource exhausted: {detail}")]
    ResourceExhausted { detail: String },
    /// The connection closed before a response arrived.
    #[error("connection closed")]
    Closed,
    /// The call itself was malformed.
    #[error("invalid call: {detail}")]
    InvalidCall { detail: String },
    /// Any other transport-layer defect.
    #[error("transport internal error: {detail}")]
    Internal { detail: String },
}

impl TransportError {
    /// Whether the engine should retry after this failure.
    ///
    /// Only transient unreachability and remote overload qualify. Everything
    /// else reflects a defect in the call or the client and fails fast.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::ResourceExhausted { .. }
        )
    }
}

/// A capability that performs one unary remote call against a node.
///
/// Implementations resolve `node` to a live connection and exchange one
/// request for one response. The engine calls this once per attempt.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Sends `request` to `node` for `method` and awaits the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the call does not complete.
    async fn unary(
        &self,
        node: NodeId,
        method: &RemoteMethod,
        request: &[u8],
    ) -> Result<Vec<u8>, TransportError>;
}
