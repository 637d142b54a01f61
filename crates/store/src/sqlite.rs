use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Row, Sqlite};

use crate::{
    Money, NewProduct, NewTransaction, Product, ProductChanges, ProductId, Result, StoreError,
    Transaction, TransactionId, TransactionKind, TransactionQuery, TransactionRecord,
    store::{InventoryStore, StoreTransaction},
};

macro_rules! select_products {
    ($tail:literal) => {
        concat!(
            "SELECT id, name, description, category, price_cents, quantity, min_stock, ",
            "supplier, created_at, last_updated FROM products ",
            $tail
        )
    };
}

/// SQLite-backed store implementation.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a new SQLite store over an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `url`, creating the database file if needed.
    ///
    /// In-memory URLs get a single long-lived connection, since every
    /// connection to `:memory:` is its own database.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let mut pool_options = SqlitePoolOptions::new();
        if in_memory {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;
        tracing::debug!(url, in_memory, "connected to sqlite store");
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn encode_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>> {
    let raw: String = row.try_get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("{column} '{raw}': {e}")))
}

fn row_to_product(row: &SqliteRow) -> Result<Product> {
    Ok(Product {
        id: ProductId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        category: row.try_get("category")?,
        price: Money::from_cents(row.try_get("price_cents")?),
        quantity: row.try_get("quantity")?,
        min_stock: row.try_get("min_stock")?,
        supplier: row.try_get("supplier")?,
        created_at: decode_timestamp(row, "created_at")?,
        last_updated: decode_timestamp(row, "last_updated")?,
    })
}

fn row_to_record(row: &SqliteRow) -> Result<TransactionRecord> {
    let kind: String = row.try_get("transaction_type")?;
    let kind = TransactionKind::from_str(&kind).map_err(StoreError::Corrupt)?;

    Ok(TransactionRecord {
        transaction: Transaction {
            id: TransactionId::new(row.try_get("id")?),
            product_id: ProductId::new(row.try_get("product_id")?),
            kind,
            quantity: row.try_get("quantity")?,
            unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
            notes: row.try_get("notes")?,
            timestamp: decode_timestamp(row, "timestamp")?,
        },
        product_name: row.try_get("product_name")?,
    })
}

/// Maps a UNIQUE violation on `products.name` to `DuplicateName`.
fn name_conflict(err: sqlx::Error, name: &str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return StoreError::DuplicateName(name.to_string());
    }
    StoreError::Database(err)
}

async fn fetch_product(conn: &mut SqliteConnection, id: ProductId) -> Result<Option<Product>> {
    let row = sqlx::query(select_products!("WHERE id = ?"))
        .bind(id.as_i64())
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(row_to_product).transpose()
}

async fn fetch_product_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<Product>> {
    let row = sqlx::query(select_products!("WHERE name = ?"))
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(row_to_product).transpose()
}

async fn insert_product(conn: &mut SqliteConnection, product: NewProduct) -> Result<Product> {
    let created_at = encode_timestamp(product.created_at);
    let result = sqlx::query(
        r#"
        INSERT INTO products (name, description, category, price_cents, quantity, min_stock,
                              supplier, created_at, last_updated)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.category.clone())
    .bind(product.price.cents())
    .bind(product.quantity)
    .bind(product.min_stock)
    .bind(product.supplier.clone())
    .bind(&created_at)
    .bind(&created_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| name_conflict(e, &product.name))?;

    Ok(product.into_product(ProductId::new(result.last_insert_rowid())))
}

async fn update_product(
    conn: &mut SqliteConnection,
    id: ProductId,
    changes: ProductChanges,
) -> Result<Option<Product>> {
    // Build dynamic SET list; binds below follow the same order
    let mut sql = String::from("UPDATE products SET last_updated = ?");
    if changes.name.is_some() {
        sql.push_str(", name = ?");
    }
    if changes.description.is_some() {
        sql.push_str(", description = ?");
    }
    if changes.category.is_some() {
        sql.push_str(", category = ?");
    }
    if changes.price.is_some() {
        sql.push_str(", price_cents = ?");
    }
    if changes.quantity.is_some() {
        sql.push_str(", quantity = ?");
    }
    if changes.min_stock.is_some() {
        sql.push_str(", min_stock = ?");
    }
    if changes.supplier.is_some() {
        sql.push_str(", supplier = ?");
    }
    sql.push_str(" WHERE id = ?");

    let mut query = sqlx::query(&sql).bind(encode_timestamp(changes.last_updated));
    if let Some(name) = &changes.name {
        query = query.bind(name.clone());
    }
    if let Some(description) = &changes.description {
        query = query.bind(description.clone());
    }
    if let Some(category) = &changes.category {
        query = query.bind(category.clone());
    }
    if let Some(price) = changes.price {
        query = query.bind(price.cents());
    }
    if let Some(quantity) = changes.quantity {
        query = query.bind(quantity);
    }
    if let Some(min_stock) = changes.min_stock {
        query = query.bind(min_stock);
    }
    if let Some(supplier) = &changes.supplier {
        query = query.bind(supplier.clone());
    }
    query = query.bind(id.as_i64());

    let result = query
        .execute(&mut *conn)
        .await
        .map_err(|e| name_conflict(e, changes.name.as_deref().unwrap_or_default()))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    fetch_product(conn, id).await
}

async fn delete_product(conn: &mut SqliteConnection, id: ProductId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id.as_i64())
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn insert_transaction(
    conn: &mut SqliteConnection,
    transaction: NewTransaction,
) -> Result<Transaction> {
    let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = ?)")
        .bind(transaction.product_id.as_i64())
        .fetch_one(&mut *conn)
        .await?;
    if exists == 0 {
        return Err(StoreError::ProductNotFound(transaction.product_id));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO transactions (product_id, transaction_type, quantity, unit_price_cents,
                                  timestamp, notes)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(transaction.product_id.as_i64())
    .bind(transaction.kind.as_str())
    .bind(transaction.quantity)
    .bind(transaction.unit_price.cents())
    .bind(encode_timestamp(transaction.timestamp))
    .bind(transaction.notes.clone())
    .execute(&mut *conn)
    .await?;

    Ok(transaction.into_transaction(TransactionId::new(result.last_insert_rowid())))
}

#[async_trait]
impl InventoryStore for SqliteStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqliteTransaction { tx: Some(tx) }))
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch_product(&mut conn, id).await
    }

    async fn get_product_by_name(&self, name: &str) -> Result<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch_product_by_name(&mut conn, name).await
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(select_products!("ORDER BY name ASC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_product).collect()
    }

    async fn search_products(&self, term: &str) -> Result<Vec<Product>> {
        // Filtered here rather than with LIKE, which only folds ASCII case.
        let needle = term.to_lowercase();
        let mut products = self.list_products().await?;
        products.retain(|p| p.matches_search(&needle));
        Ok(products)
    }

    async fn list_transactions(&self, query: TransactionQuery) -> Result<Vec<TransactionRecord>> {
        // LEFT JOIN keeps entries whose product has been deleted
        let mut sql = String::from(
            "SELECT t.id, t.product_id, t.transaction_type, t.quantity, t.unit_price_cents, \
             t.timestamp, t.notes, p.name AS product_name \
             FROM transactions t LEFT JOIN products p ON p.id = t.product_id",
        );
        if query.product_id.is_some() {
            sql.push_str(" WHERE t.product_id = ?");
        }
        sql.push_str(" ORDER BY t.timestamp DESC, t.id DESC");
        if query.limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        let mut sqlx_query = sqlx::query(&sql);
        if let Some(product_id) = query.product_id {
            sqlx_query = sqlx_query.bind(product_id.as_i64());
        }
        if let Some(limit) = query.limit {
            sqlx_query = sqlx_query.bind(limit as i64);
        }

        let rows = sqlx_query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_record).collect()
    }
}

/// Unit of work for [`SqliteStore`], backed by a database transaction.
///
/// Dropping it without committing rolls the transaction back.
pub struct SqliteTransaction {
    tx: Option<sqlx::Transaction<'static, Sqlite>>,
}

impl SqliteTransaction {
    fn conn(&mut self) -> Result<&mut SqliteConnection> {
        self.tx.as_deref_mut().ok_or(StoreError::TransactionClosed)
    }
}

#[async_trait]
impl StoreTransaction for SqliteTransaction {
    async fn get_product(&mut self, id: ProductId) -> Result<Option<Product>> {
        fetch_product(self.conn()?, id).await
    }

    async fn get_product_by_name(&mut self, name: &str) -> Result<Option<Product>> {
        fetch_product_by_name(self.conn()?, name).await
    }

    async fn create_product(&mut self, product: NewProduct) -> Result<Product> {
        insert_product(self.conn()?, product).await
    }

    async fn update_product(
        &mut self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Option<Product>> {
        update_product(self.conn()?, id, changes).await
    }

    async fn delete_product(&mut self, id: ProductId) -> Result<bool> {
        delete_product(self.conn()?, id).await
    }

    async fn append_transaction(&mut self, transaction: NewTransaction) -> Result<Transaction> {
        insert_transaction(self.conn()?, transaction).await
    }

    async fn commit(&mut self) -> Result<()> {
        let tx = self.tx.take().ok_or(StoreError::TransactionClosed)?;
        tx.commit().await?;
        Ok(())
    }
}
