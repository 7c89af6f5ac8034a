//! Azure identity and network control plane access.
//!
//! - [`credential`] - service principal token exchange
//! - [`network`] - NIC read/update over the ARM REST API
//! - [`operation`] - long-running operation handles and polling state

mod credential;
mod network;
mod operation;

// Re-export public types and functions
pub use credential::{ServicePrincipal, TokenSource};
pub use network::{ArmNetworkClient, NetworkControlPlane};
pub use operation::{OperationHandle, OperationState, OperationStatus};
