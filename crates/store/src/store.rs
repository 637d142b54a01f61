use async_trait::async_trait;

use crate::{
    NewProduct, NewTransaction, Product, ProductChanges, ProductId, Result, Transaction,
    TransactionQuery, TransactionRecord,
};

/// Core trait for inventory store implementations.
///
/// Reads go straight to the store. Writes happen inside a unit of work
/// obtained from [`InventoryStore::begin`]. All implementations must be
/// thread-safe (Send + Sync).
///
/// Callers must not issue reads on the store while they hold an open unit of
/// work; use the read methods on [`StoreTransaction`] instead.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Opens a unit of work. Nothing it writes is visible until
    /// [`StoreTransaction::commit`]; dropping it discards the writes.
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>>;

    /// Looks up a product by id.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>>;

    /// Looks up a product by exact (case-sensitive) name.
    async fn get_product_by_name(&self, name: &str) -> Result<Option<Product>>;

    /// Returns every product ordered by name ascending (byte-wise).
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Case-insensitive substring search across name, category and supplier,
    /// ordered by name. An empty term matches every product.
    async fn search_products(&self, term: &str) -> Result<Vec<Product>>;

    /// Returns ledger entries joined with product names, most recent first.
    ///
    /// Entries whose product was deleted are included with no name.
    async fn list_transactions(&self, query: TransactionQuery) -> Result<Vec<TransactionRecord>>;
}

/// A unit of work against the store.
///
/// The ledger is append-only: there is deliberately no way to modify or
/// remove a transaction once appended.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Looks up a product by id, seeing writes made in this unit of work.
    async fn get_product(&mut self, id: ProductId) -> Result<Option<Product>>;

    /// Looks up a product by exact name, seeing writes made in this unit of work.
    async fn get_product_by_name(&mut self, name: &str) -> Result<Option<Product>>;

    /// Inserts a product and returns it with its assigned id.
    ///
    /// Fails with `DuplicateName` if the name is taken.
    async fn create_product(&mut self, product: NewProduct) -> Result<Product>;

    /// Applies column changes. Returns `None` if the product doesn't exist.
    ///
    /// Fails with `DuplicateName` if a rename collides with another product.
    async fn update_product(
        &mut self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Option<Product>>;

    /// Hard-deletes a product. Returns false if it didn't exist.
    ///
    /// Ledger entries for the product are left in place.
    async fn delete_product(&mut self, id: ProductId) -> Result<bool>;

    /// Appends a ledger entry.
    ///
    /// Fails with `ProductNotFound` if the product doesn't exist at write time.
    async fn append_transaction(&mut self, transaction: NewTransaction) -> Result<Transaction>;

    /// Makes every write in this unit of work durable.
    ///
    /// Any further use of the unit of work fails with `TransactionClosed`.
    async fn commit(&mut self) -> Result<()>;
}

/// Extension trait providing single-write convenience methods.
///
/// Each method runs one write in its own unit of work.
#[async_trait]
pub trait InventoryStoreExt: InventoryStore {
    /// Inserts a product in its own unit of work.
    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        let mut tx = self.begin().await?;
        let product = tx.create_product(product).await?;
        tx.commit().await?;
        Ok(product)
    }

    /// Updates a product in its own unit of work.
    async fn update_product(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Option<Product>> {
        let mut tx = self.begin().await?;
        let product = tx.update_product(id, changes).await?;
        tx.commit().await?;
        Ok(product)
    }

    /// Deletes a product in its own unit of work.
    async fn delete_product(&self, id: ProductId) -> Result<bool> {
        let mut tx = self.begin().await?;
        let deleted = tx.delete_product(id).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    /// Appends a ledger entry in its own unit of work.
    async fn append_transaction(&self, transaction: NewTransaction) -> Result<Transaction> {
        let mut tx = self.begin().await?;
        let transaction = tx.append_transaction(transaction).await?;
        tx.commit().await?;
        Ok(transaction)
    }
}

// Blanket implementation for all InventoryStore implementations
impl<T: InventoryStore + ?Sized> InventoryStoreExt for T {}
