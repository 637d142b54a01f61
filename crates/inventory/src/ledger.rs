//! The append-only stock ledger.

use store::{
    InventoryStore, NewTransaction, ProductId, StoreTransaction, Transaction, TransactionKind,
    TransactionQuery, TransactionRecord,
};

use crate::error::InventoryError;

/// Append-only record of every stock movement.
///
/// Entries are written inside the caller's unit of work so that they commit
/// together with the product change they describe. There is no way to edit
/// or remove an entry.
pub struct Ledger<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> Ledger<S> {
    /// Creates a ledger reading from the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Appends an entry as part of an open unit of work.
    ///
    /// Movements must carry a positive quantity. The opening entry may be
    /// zero, since a product can be created with no stock.
    pub async fn append(
        &self,
        tx: &mut dyn StoreTransaction,
        entry: NewTransaction,
    ) -> Result<Transaction, InventoryError> {
        if entry.kind != TransactionKind::InitialStock && entry.quantity == 0 {
            return Err(InventoryError::InvalidQuantity { quantity: 0 });
        }
        if entry.unit_price.is_negative() {
            return Err(InventoryError::InvalidPrice {
                price: entry.unit_price,
            });
        }

        let transaction = tx.append_transaction(entry).await?;

        metrics::counter!("ledger_entries_appended_total", "kind" => transaction.kind.as_str())
            .increment(1);
        tracing::debug!(
            transaction_id = %transaction.id,
            product_id = %transaction.product_id,
            kind = %transaction.kind,
            quantity = transaction.quantity,
            "Ledger entry appended"
        );

        Ok(transaction)
    }

    /// Returns entries most recent first, optionally for one product.
    ///
    /// Entries for deleted products are included with no product name.
    #[tracing::instrument(skip(self))]
    pub async fn query_by(
        &self,
        product_id: Option<ProductId>,
    ) -> Result<Vec<TransactionRecord>, InventoryError> {
        self.query(TransactionQuery::new().product_id(product_id)).await
    }

    /// Runs an arbitrary ledger query.
    pub async fn query(
        &self,
        query: TransactionQuery,
    ) -> Result<Vec<TransactionRecord>, InventoryError> {
        Ok(self.store.list_transactions(query).await?)
    }
}
