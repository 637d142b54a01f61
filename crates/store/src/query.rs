use crate::ProductId;

/// Filter for reading ledger entries.
///
/// Results are always ordered most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    /// Filter by product ID.
    pub product_id: Option<ProductId>,

    /// Maximum number of entries to return.
    pub limit: Option<usize>,
}

impl TransactionQuery {
    /// Creates a query over the whole ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for a single product.
    pub fn for_product(product_id: ProductId) -> Self {
        Self {
            product_id: Some(product_id),
            ..Default::default()
        }
    }

    /// Filters by product ID when one is given.
    pub fn product_id(mut self, product_id: Option<ProductId>) -> Self {
        self.product_id = product_id;
        self
    }

    /// Limits the number of entries returned.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
