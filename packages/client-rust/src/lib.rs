//! Meridian Client — request execution, retry policy, and node selection for
//! the Meridian ledger network.

pub mod backoff;
pub mod client;
pub mod config;
pub mod execute;
pub mod network;
pub mod transport;

pub use backoff::{Backoff, BackoffConfig};
pub use client::Client;
pub use config::{ClientConfig, NetworkConfig, NodeEntry};
pub use execute::{execute, Executable, ExecuteError};
pub use network::{Network, NetworkError, NodeId};
pub use transport::{Channel, RemoteMethod, TransportError};
