//! Long-running ARM operations.
//!
//! A NIC update either completes in the PUT response or returns an
//! `Azure-AsyncOperation` URL that is polled until a terminal status.

use crate::models::NetworkInterface;
use serde::Deserialize;
use std::time::Duration;

/// Result of submitting an update.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationHandle {
    /// The control plane answered with the final resource.
    Completed(NetworkInterface),
    /// The update is still running.
    Pending {
        status_url: String,
        retry_after: Duration,
        resource_group: String,
        interface_name: String,
    },
}

/// Body returned by an `Azure-AsyncOperation` status URL.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct OperationStatus {
    pub status: String,
    #[serde(default)]
    pub error: Option<ArmError>,
}

/// ARM error detail.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ArmError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Envelope of an ARM error response.
#[derive(Deserialize, Debug)]
pub struct ArmErrorBody {
    pub error: ArmError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationState {
    InProgress,
    Succeeded,
    Failed(String),
}

impl OperationStatus {
    pub fn state(&self) -> OperationState {
        match self.status.as_str() {
            "Succeeded" => OperationState::Succeeded,
            "Failed" | "Canceled" => {
                let detail = self
                    .error
                    .as_ref()
                    .map(|e| format!(": {} {}", e.code, e.message))
                    .unwrap_or_default();
                OperationState::Failed(format!("status={}{detail}", self.status))
            }
            _ => OperationState::InProgress,
        }
    }
}

/// Polling delay from a `Retry-After` header value in seconds, `fallback`
/// when the header is missing, zero or not a number.
pub fn retry_after(header: Option<&str>, fallback: Duration) -> Duration {
    header
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|s| *s > 0)
        .map(Duration::from_secs)
        .unwrap_or(fallback)
}

/// Readable message from an ARM error response body.
pub fn arm_error_message(body: &str) -> String {
    match serde_json::from_str::<ArmErrorBody>(body) {
        Ok(b) => format!("{}: {}", b.error.code, b.error.message),
        Err(_) => body.chars().take(500).collect(),
    }
}
