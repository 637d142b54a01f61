//! Report error types.

use thiserror::Error;

/// Errors that can occur while generating a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// An error occurred reading from the store.
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    /// A stock value or total doesn't fit in the money type.
    #[error("Inventory value of {context} is too large to represent")]
    ValueOverflow { context: String },
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
