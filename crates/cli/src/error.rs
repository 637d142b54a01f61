//! Front-end error types.

use inventory::{ErrorKind, InventoryError};
use reports::ReportError;
use store::StoreError;
use thiserror::Error;

use crate::command::CommandError;

/// Errors surfaced to the user.
#[derive(Debug, Error)]
pub enum CliError {
    /// The line could not be parsed.
    #[error("{0}")]
    Command(#[from] CommandError),

    /// An inventory operation was refused or failed.
    #[error("{0}")]
    Inventory(#[from] InventoryError),

    /// A report could not be generated.
    #[error("{0}")]
    Report(#[from] ReportError),

    /// The store could not be opened.
    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Returns true when the session can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CliError::Command(_) | CliError::Json(_) => true,
            CliError::Inventory(err) => err.kind() != ErrorKind::StoreFailure,
            CliError::Report(ReportError::ValueOverflow { .. }) => true,
            CliError::Report(_) | CliError::Store(_) | CliError::Io(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_overflow_keeps_the_session() {
        let err = CliError::from(ReportError::ValueOverflow {
            context: "the inventory".to_string(),
        });
        assert!(err.is_recoverable());
    }

    #[test]
    fn store_failures_end_the_session() {
        let err = CliError::from(ReportError::Store(StoreError::TransactionClosed));
        assert!(!err.is_recoverable());
        assert!(!CliError::from(StoreError::TransactionClosed).is_recoverable());
    }
}
