//! Persistence layer for products and the stock ledger.
//!
//! The [`InventoryStore`] trait is the contract the inventory core talks to.
//! Writes go through a [`StoreTransaction`] unit of work so that a product
//! write and its ledger entry either both land or neither does.

pub mod error;
pub mod memory;
pub mod query;
pub mod record;
pub mod sqlite;
pub mod store;

pub use common::{Money, ProductId, TransactionId};
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use query::TransactionQuery;
pub use record::{
    NewProduct, NewTransaction, Product, ProductChanges, Transaction, TransactionKind,
    TransactionRecord,
};
pub use sqlite::SqliteStore;
pub use store::{InventoryStore, InventoryStoreExt, StoreTransaction};
