use thiserror::Error;

use crate::ProductId;

/// Errors that can occur when interacting with the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write referenced a product that does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// A product with this name already exists.
    #[error("A product named '{0}' already exists")]
    DuplicateName(String),

    /// The unit of work was used after it was committed.
    #[error("Store transaction already committed")]
    TransactionClosed,

    /// A stored row could not be decoded into a record.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
