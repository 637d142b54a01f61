use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    NewProduct, NewTransaction, Product, ProductChanges, ProductId, Result, StoreError,
    Transaction, TransactionId, TransactionQuery, TransactionRecord,
    store::{InventoryStore, StoreTransaction},
};

/// Rows held by the in-memory store.
#[derive(Debug, Clone, Default)]
struct MemoryState {
    products: BTreeMap<ProductId, Product>,
    transactions: Vec<Transaction>,
    last_product_id: i64,
    last_transaction_id: i64,
}

impl MemoryState {
    fn find_by_name(&self, name: &str) -> Option<&Product> {
        self.products.values().find(|p| p.name == name)
    }

    fn history(&self, query: &TransactionQuery) -> Vec<TransactionRecord> {
        let mut records: Vec<_> = self
            .transactions
            .iter()
            .filter(|t| query.product_id.is_none_or(|id| t.product_id == id))
            .map(|t| TransactionRecord {
                transaction: t.clone(),
                product_name: self.products.get(&t.product_id).map(|p| p.name.clone()),
            })
            .collect();

        // Most recent first; ids break timestamp ties.
        records.sort_by(|a, b| {
            b.transaction
                .timestamp
                .cmp(&a.transaction.timestamp)
                .then(b.transaction.id.cmp(&a.transaction.id))
        });

        if let Some(limit) = query.limit {
            records.truncate(limit);
        }
        records
    }
}

fn sorted_by_name<'a>(products: impl Iterator<Item = &'a Product>) -> Vec<Product> {
    let mut products: Vec<_> = products.cloned().collect();
    products.sort_by(|a, b| a.name.cmp(&b.name));
    products
}

/// In-memory store implementation.
///
/// Units of work are serialized: [`InventoryStore::begin`] holds the store
/// lock until the unit of work is committed or dropped, and writes are
/// staged on a copy of the rows. Used by the test suites and by the front
/// end when no database is configured.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of products stored.
    pub async fn product_count(&self) -> usize {
        self.state.lock().await.products.len()
    }

    /// Returns the number of ledger entries stored.
    pub async fn transaction_count(&self) -> usize {
        self.state.lock().await.transactions.len()
    }
}

#[async_trait]
impl InventoryStore for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryTransaction {
            guard: Some(guard),
            staged,
        }))
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.state.lock().await.products.get(&id).cloned())
    }

    async fn get_product_by_name(&self, name: &str) -> Result<Option<Product>> {
        Ok(self.state.lock().await.find_by_name(name).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let state = self.state.lock().await;
        Ok(sorted_by_name(state.products.values()))
    }

    async fn search_products(&self, term: &str) -> Result<Vec<Product>> {
        let needle = term.to_lowercase();
        let state = self.state.lock().await;
        Ok(sorted_by_name(
            state.products.values().filter(|p| p.matches_search(&needle)),
        ))
    }

    async fn list_transactions(&self, query: TransactionQuery) -> Result<Vec<TransactionRecord>> {
        Ok(self.state.lock().await.history(&query))
    }
}

/// Unit of work for [`InMemoryStore`].
pub struct InMemoryTransaction {
    guard: Option<OwnedMutexGuard<MemoryState>>,
    staged: MemoryState,
}

impl InMemoryTransaction {
    fn state(&mut self) -> Result<&mut MemoryState> {
        if self.guard.is_none() {
            return Err(StoreError::TransactionClosed);
        }
        Ok(&mut self.staged)
    }
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn get_product(&mut self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.state()?.products.get(&id).cloned())
    }

    async fn get_product_by_name(&mut self, name: &str) -> Result<Option<Product>> {
        Ok(self.state()?.find_by_name(name).cloned())
    }

    async fn create_product(&mut self, product: NewProduct) -> Result<Product> {
        let state = self.state()?;
        if state.find_by_name(&product.name).is_some() {
            return Err(StoreError::DuplicateName(product.name));
        }

        state.last_product_id += 1;
        let product = product.into_product(ProductId::new(state.last_product_id));
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &mut self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Option<Product>> {
        let state = self.state()?;
        if let Some(name) = &changes.name
            && state.find_by_name(name).is_some_and(|other| other.id != id)
        {
            return Err(StoreError::DuplicateName(name.clone()));
        }

        let Some(product) = state.products.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(product);
        Ok(Some(product.clone()))
    }

    async fn delete_product(&mut self, id: ProductId) -> Result<bool> {
        Ok(self.state()?.products.remove(&id).is_some())
    }

    async fn append_transaction(&mut self, transaction: NewTransaction) -> Result<Transaction> {
        let state = self.state()?;
        if !state.products.contains_key(&transaction.product_id) {
            return Err(StoreError::ProductNotFound(transaction.product_id));
        }

        state.last_transaction_id += 1;
        let transaction = transaction.into_transaction(TransactionId::new(state.last_transaction_id));
        state.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn commit(&mut self) -> Result<()> {
        let mut guard = self.guard.take().ok_or(StoreError::TransactionClosed)?;
        *guard = std::mem::take(&mut self.staged);
        Ok(())
    }
}
