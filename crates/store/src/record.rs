//! Product and transaction records as they are persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Money, ProductId, TransactionId};

/// A trackable inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// `None` when the product has no category. Reports bucket these under
    /// a display label; the label is never stored.
    pub category: Option<String>,
    pub price: Money,
    /// Units currently on hand.
    pub quantity: u32,
    /// Low-stock threshold (inclusive).
    pub min_stock: u32,
    pub supplier: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Product {
    /// Returns true when stock is at or below the threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }

    /// Units missing to get back to the threshold.
    pub fn shortage(&self) -> u32 {
        self.min_stock.saturating_sub(self.quantity)
    }

    /// price × quantity, exact to the cent. `None` if it doesn't fit.
    pub fn stock_value(&self) -> Option<Money> {
        self.price.checked_mul(self.quantity)
    }

    /// Case-insensitive substring match on name, category or supplier.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        let contains = |field: &str| field.to_lowercase().contains(needle);
        contains(&self.name)
            || self.category.as_deref().is_some_and(contains)
            || self.supplier.as_deref().is_some_and(contains)
    }
}

/// Fields for inserting a product. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub price: Money,
    pub quantity: u32,
    pub min_stock: u32,
    pub supplier: Option<String>,
    /// Used for both `created_at` and `last_updated`.
    pub created_at: DateTime<Utc>,
}

impl NewProduct {
    pub(crate) fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            quantity: self.quantity,
            min_stock: self.min_stock,
            supplier: self.supplier,
            created_at: self.created_at,
            last_updated: self.created_at,
        }
    }
}

/// Column-level changes to an existing product row.
///
/// `None` leaves a column untouched. For the nullable columns the inner
/// option distinguishes "set" from "clear". `last_updated` is always written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Option<String>>,
    pub price: Option<Money>,
    pub quantity: Option<u32>,
    pub min_stock: Option<u32>,
    pub supplier: Option<Option<String>>,
    pub last_updated: DateTime<Utc>,
}

impl ProductChanges {
    /// Creates an empty change set stamped with `last_updated`.
    pub fn touch(last_updated: DateTime<Utc>) -> Self {
        Self {
            name: None,
            description: None,
            category: None,
            price: None,
            quantity: None,
            min_stock: None,
            supplier: None,
            last_updated,
        }
    }

    /// Sets the quantity column.
    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub(crate) fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        if let Some(min_stock) = self.min_stock {
            product.min_stock = min_stock;
        }
        if let Some(supplier) = &self.supplier {
            product.supplier = supplier.clone();
        }
        product.last_updated = self.last_updated;
    }
}

/// Kind of stock movement recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    InitialStock,
    StockIn,
    StockOut,
}

impl TransactionKind {
    /// Returns the stored column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::InitialStock => "INITIAL_STOCK",
            TransactionKind::StockIn => "STOCK_IN",
            TransactionKind::StockOut => "STOCK_OUT",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INITIAL_STOCK" => Ok(TransactionKind::InitialStock),
            "STOCK_IN" => Ok(TransactionKind::StockIn),
            "STOCK_OUT" => Ok(TransactionKind::StockOut),
            other => Err(format!("unknown transaction type '{other}'")),
        }
    }
}

/// Fields for appending a ledger entry. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub product_id: ProductId,
    pub kind: TransactionKind,
    pub quantity: u32,
    /// Zero means the price was not recorded.
    pub unit_price: Money,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl NewTransaction {
    pub(crate) fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            product_id: self.product_id,
            kind: self.kind,
            quantity: self.quantity,
            unit_price: self.unit_price,
            notes: self.notes,
            timestamp: self.timestamp,
        }
    }
}

/// An immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub product_id: ProductId,
    pub kind: TransactionKind,
    pub quantity: u32,
    pub unit_price: Money,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A ledger entry joined with the name of its product.
///
/// `product_name` is `None` when the product has since been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub product_name: Option<String>,
}

impl TransactionRecord {
    pub fn is_orphaned(&self) -> bool {
        self.product_name.is_none()
    }
}
