//! Inventory management on top of the store.
//!
//! This crate provides:
//! - [`InventoryManager`] for catalog changes and stock movements
//! - [`Ledger`] for appending and querying stock movements
//! - Request types describing each operation
//! - [`InventoryError`] with a stable [`ErrorKind`] per failure

pub mod commands;
pub mod error;
pub mod ledger;
pub mod manager;

pub use commands::{NewProductSpec, ProductUpdate, StockAdjustment, StockDirection};
pub use error::{ErrorKind, InventoryError};
pub use ledger::Ledger;
pub use manager::{InventoryManager, StockMovement};
pub use store::{
    InMemoryStore, InventoryStore, Money, Product, ProductId, SqliteStore, StoreError,
    Transaction, TransactionId, TransactionKind, TransactionQuery, TransactionRecord,
};
