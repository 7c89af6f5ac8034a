//! Error taxonomy for a sync run.
//!
//! Every variant is terminal for the run. The variant names the step that
//! failed, the message carries the underlying cause.

use thiserror::Error;

/// Failure of one step of a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Site or secret configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),
    /// Service principal token exchange failed.
    #[error("credential error: {0}")]
    Credential(String),
    /// Reading the network interface failed.
    #[error("read error ({step}): {cause}")]
    Read { step: &'static str, cause: String },
    /// The on-prem locator could not enumerate addresses.
    #[error("locator error: {0}")]
    Locator(String),
    /// The current configuration list breaks the primary invariant.
    #[error("compute error: {0}")]
    Compute(String),
    /// Submitting the update or waiting for it failed.
    #[error("write error ({step}): {cause}")]
    Write { step: &'static str, cause: String },
}

impl SyncError {
    pub fn read(step: &'static str, cause: impl ToString) -> Self {
        SyncError::Read {
            step,
            cause: cause.to_string(),
        }
    }

    pub fn write(step: &'static str, cause: impl ToString) -> Self {
        SyncError::Write {
            step,
            cause: cause.to_string(),
        }
    }

    /// Process exit code, distinct per failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            SyncError::Config(_) => 2,
            SyncError::Credential(_) => 3,
            SyncError::Read { .. } => 4,
            SyncError::Locator(_) => 5,
            SyncError::Compute(_) => 6,
            SyncError::Write { .. } => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            SyncError::Config("x".into()),
            SyncError::Credential("x".into()),
            SyncError::read("get_interface", "x"),
            SyncError::Locator("x".into()),
            SyncError::Compute("x".into()),
            SyncError::write("update_interface", "x"),
        ];
        let mut codes: Vec<u8> = errors.iter().map(|e| e.exit_code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(!codes.contains(&0), "0 is reserved for success");
    }

    #[test]
    fn test_display_names_step() {
        let e = SyncError::write("await_operation", "status=Failed");
        assert_eq!(e.to_string(), "write error (await_operation): status=Failed");
    }
}
