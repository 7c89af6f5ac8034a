//! Configuration list processing.
//!
//! - [`reconcile`] - computes the new ipconfig list of a NIC

mod reconcile;

// Re-export public functions
pub use reconcile::{reconcile, ReconcilePlan};
