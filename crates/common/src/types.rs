use serde::{Deserialize, Serialize};

/// Unique identifier for a product row.
///
/// Assigned by the store on insert. Wrapping the raw integer keeps product ids
/// from being mixed up with transaction ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Creates a product ID from a raw store key.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ProductId> for i64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// Unique identifier for a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(i64);

impl TransactionId {
    /// Creates a transaction ID from a raw store key.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TransactionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
