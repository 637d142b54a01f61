//! Inventory error types.

use store::{Money, ProductId, StoreError};
use thiserror::Error;

/// Errors that can occur during inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// No product with the given id.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// Another product already uses the name.
    #[error("A product named '{name}' already exists")]
    DuplicateName { name: String },

    /// A stock-out would take the quantity below zero.
    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Movement quantity must be positive.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: i64 },

    /// Prices can't be negative.
    #[error("Invalid price: {price} (must not be negative)")]
    InvalidPrice { price: Money },

    /// price × quantity can't be represented.
    #[error("Stock value of {quantity} units at {price} is too large")]
    StockValueOverflow { price: Money, quantity: u32 },

    #[error("Product name must not be empty")]
    EmptyName,

    #[error("No fields given to update")]
    NoFieldsGiven,

    /// The store failed underneath the operation.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for InventoryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateName(name) => InventoryError::DuplicateName { name },
            StoreError::ProductNotFound(id) => InventoryError::NotFound(id),
            other => InventoryError::Store(other),
        }
    }
}

/// Machine-readable classification of an [`InventoryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    DuplicateName,
    InsufficientStock,
    InvalidQuantity,
    InvalidPrice,
    StockValueOverflow,
    EmptyName,
    NoFieldsGiven,
    StoreFailure,
}

impl ErrorKind {
    /// Returns the label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::DuplicateName => "duplicate_name",
            ErrorKind::InsufficientStock => "insufficient_stock",
            ErrorKind::InvalidQuantity => "invalid_quantity",
            ErrorKind::InvalidPrice => "invalid_price",
            ErrorKind::StockValueOverflow => "stock_value_overflow",
            ErrorKind::EmptyName => "empty_name",
            ErrorKind::NoFieldsGiven => "no_fields_given",
            ErrorKind::StoreFailure => "store_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl InventoryError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            InventoryError::NotFound(_) => ErrorKind::NotFound,
            InventoryError::DuplicateName { .. } => ErrorKind::DuplicateName,
            InventoryError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            InventoryError::InvalidQuantity { .. } => ErrorKind::InvalidQuantity,
            InventoryError::InvalidPrice { .. } => ErrorKind::InvalidPrice,
            InventoryError::StockValueOverflow { .. } => ErrorKind::StockValueOverflow,
            InventoryError::EmptyName => ErrorKind::EmptyName,
            InventoryError::NoFieldsGiven => ErrorKind::NoFieldsGiven,
            InventoryError::Store(_) => ErrorKind::StoreFailure,
        }
    }

    /// Returns true when the operation was refused by a business rule
    /// rather than failing in the store.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, InventoryError::Store(_))
    }
}
