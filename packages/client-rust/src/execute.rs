//! Generic request execution with retry.
//!
//! Drives one logical call (a transaction submission or a query) through
//! attempts until it reaches a terminal outcome. Each attempt selects a
//! node, encodes the request, dispatches it over the [`Channel`], and
//! classifies the result into exactly one of three buckets: transport
//! failure, application status, or success. Transient conditions (an
//! unreachable node, remote overload, a `Busy` status) schedule another
//! attempt after a backoff delay; everything else terminates the call with
//! a typed result or error.
//!
//! The engine imposes no attempt cap. Callers bound a call with their own
//! deadline, e.g. `tokio::time::timeout`, and drop the future to abandon
//! it; an in-flight attempt is not forcibly aborted, the loop simply stops
//! at its next suspension point.

use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{trace, warn};

use meridian_core::{Status, TransactionId};

use crate::backoff::Backoff;
use crate::network::{Network, NodeId};
use crate::transport::{Channel, RemoteMethod, TransportError};

// ---------------------------------------------------------------------------
// Executable
// ---------------------------------------------------------------------------

/// Uniform contract between the execution engine and one operation kind.
///
/// Each request builder implements this; the engine is generic over it and
/// never branches on the concrete operation.
pub trait Executable: Send + Sync {
    /// Wire request payload.
    type Request: Serialize + Send + Sync;
    /// Wire response payload.
    type Response: DeserializeOwned + Send;
    /// Caller-visible result.
    type Output: Send;

    /// Builds the wire request. Called once per attempt and must produce
    /// the same payload each time.
    fn make_request(&self) -> Self::Request;

    /// Decodes a successful response into the caller-visible result.
    fn map_response(&self, response: Self::Response) -> Self::Output;

    /// Extracts the application status from a raw response.
    fn map_response_status(&self, response: &Self::Response) -> Status;

    /// The remote procedure this operation invokes.
    fn method(&self) -> RemoteMethod;

    /// Selects the target node for the next attempt.
    ///
    /// The default rotates through the network so consecutive attempts fail
    /// over across nodes. Operations that must pin a node override this.
    fn node_id(&self, network: &Network) -> NodeId {
        network.next_node()
    }

    /// The identifier correlating this operation, if it submits a
    /// transaction. Queries return `None`.
    fn transaction_id(&self) -> Option<TransactionId> {
        None
    }

    /// Whether a completed response warrants another attempt.
    ///
    /// The default retries only on [`Status::Busy`].
    fn should_retry(&self, status: Status, response: &Self::Response) -> bool {
        let _ = response;
        status == Status::Busy
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Terminal failure of a logical call.
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    /// The transport failed in a way that is not worth retrying. Carries
    /// the raw transport error unchanged.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
    /// The network rejected the request with a terminal status.
    #[error("request rejected with status {status}")]
    Status {
        /// The application status the node answered with.
        status: Status,
        /// The identifier of the rejected transaction, when one exists.
        transaction_id: Option<TransactionId>,
    },
    /// The request payload could not be encoded.
    #[error("failed to encode request: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    /// The response payload could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Executes one logical operation against the network until it terminates.
///
/// Attempts are strictly sequential: the next attempt is dispatched only
/// after the previous one is classified and, when retrying, the backoff
/// delay has elapsed. No lock is held across a suspension point.
///
/// # Errors
///
/// Returns [`ExecuteError`] when the transport fails in a non-retryable
/// way, when the network answers with a terminal status, or when a payload
/// cannot be encoded or decoded.
pub async fn execute<E: Executable>(
    network: &Network,
    channel: &dyn Channel,
    backoff: &Backoff,
    executable: &E,
) -> Result<E::Output, ExecuteError> {
    let method = executable.method();
    let mut attempt: u32 = 1;

    loop {
        let node_id = executable.node_id(network);
        let payload = rmp_serde::to_vec_named(&executable.make_request())?;

        trace!(node = %node_id, attempt, method = %method, "sending request");
        let started = Instant::now();

        let response_bytes = match channel.unary(node_id, &method, &payload).await {
            Ok(bytes) => bytes,
            Err(error) if error.is_retryable() => {
                warn!(node = %node_id, attempt, %error, "transport failure, retrying");
                tokio::time::sleep(backoff.delay_for(attempt)).await;
                attempt += 1;
                continue;
            }
            // Not a transient network condition: fail fast with the raw
            // transport error, without touching the response path.
            Err(error) => return Err(ExecuteError::Transport(error)),
        };

        let response: E::Response = rmp_serde::from_slice(&response_bytes)?;
        let status = executable.map_response_status(&response);

        trace!(
            node = %node_id,
            attempt,
            %status,
            latency = ?started.elapsed(),
            "received response"
        );

        if executable.should_retry(status, &response) {
            warn!(node = %node_id, attempt, %status, "node busy, retrying");
            tokio::time::sleep(backoff.delay_for(attempt)).await;
            attempt += 1;
            continue;
        }

        if status != Status::Ok {
            return Err(ExecuteError::Status {
                status,
                transaction_id: executable.transaction_id(),
            });
        }

        return Ok(executable.map_response(response));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
