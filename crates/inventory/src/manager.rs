//! Inventory manager providing the catalog and stock operations.

use chrono::{DateTime, SubsecRound, Utc};
use store::{
    InventoryStore, InventoryStoreExt, Money, NewProduct, NewTransaction, Product,
    ProductChanges, ProductId, Transaction, TransactionKind, TransactionRecord,
};

use crate::commands::{NewProductSpec, ProductUpdate, StockAdjustment, StockDirection};
use crate::error::InventoryError;
use crate::ledger::Ledger;

/// Outcome of a stock adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMovement {
    /// The product after the adjustment.
    pub product: Product,

    /// The ledger entry recording it.
    pub transaction: Transaction,
}

/// Service for managing products and their stock.
///
/// Every change to a product's quantity is written in the same unit of work
/// as the ledger entry describing it.
pub struct InventoryManager<S: InventoryStore> {
    store: S,
    ledger: Ledger<S>,
}

impl<S: InventoryStore + Clone> InventoryManager<S> {
    /// Creates a new manager over the given store.
    pub fn new(store: S) -> Self {
        Self {
            ledger: Ledger::new(store.clone()),
            store,
        }
    }
}

impl<S: InventoryStore> InventoryManager<S> {
    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the ledger.
    pub fn ledger(&self) -> &Ledger<S> {
        &self.ledger
    }

    /// Adds a product and records its opening stock.
    ///
    /// The opening `INITIAL_STOCK` entry is written even when the quantity
    /// is zero.
    #[tracing::instrument(skip(self, spec), fields(name = %spec.name))]
    pub async fn add_product(&self, spec: NewProductSpec) -> Result<Product, InventoryError> {
        self.create(spec).await.inspect_err(record_failure)
    }

    async fn create(&self, spec: NewProductSpec) -> Result<Product, InventoryError> {
        let name = validate_name(&spec.name)?;
        if spec.price.is_negative() {
            return Err(InventoryError::InvalidPrice { price: spec.price });
        }
        check_stock_value(spec.price, spec.quantity)?;

        let now = timestamp_now();
        let mut tx = self.store.begin().await?;
        if tx.get_product_by_name(&name).await?.is_some() {
            return Err(InventoryError::DuplicateName { name });
        }

        let product = tx
            .create_product(NewProduct {
                name,
                description: spec.description,
                category: non_blank(spec.category),
                price: spec.price,
                quantity: spec.quantity,
                min_stock: spec.min_stock,
                supplier: non_blank(spec.supplier),
                created_at: now,
            })
            .await?;

        self.ledger
            .append(
                tx.as_mut(),
                NewTransaction {
                    product_id: product.id,
                    kind: TransactionKind::InitialStock,
                    quantity: product.quantity,
                    unit_price: product.price,
                    notes: Some(format!("Initial stock for {}", product.name)),
                    timestamp: now,
                },
            )
            .await?;
        tx.commit().await?;

        metrics::counter!("inventory_products_added_total").increment(1);
        tracing::info!(product_id = %product.id, quantity = product.quantity, "Product added");

        Ok(product)
    }

    /// Looks up a product by id.
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, InventoryError> {
        Ok(self.store.get_product(id).await?)
    }

    /// Looks up a product by exact, case-sensitive name.
    pub async fn get_product_by_name(&self, name: &str) -> Result<Option<Product>, InventoryError> {
        Ok(self.store.get_product_by_name(name).await?)
    }

    /// Updates descriptive fields of a product.
    ///
    /// Checks that at least one field is given before touching the store.
    #[tracing::instrument(skip(self, update))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, InventoryError> {
        self.update(id, update).await.inspect_err(record_failure)
    }

    async fn update(&self, id: ProductId, update: ProductUpdate) -> Result<Product, InventoryError> {
        if update.is_empty() {
            return Err(InventoryError::NoFieldsGiven);
        }
        let name = update.name.as_deref().map(validate_name).transpose()?;
        if let Some(price) = update.price
            && price.is_negative()
        {
            return Err(InventoryError::InvalidPrice { price });
        }

        let mut changes = ProductChanges::touch(timestamp_now());
        changes.name = name;
        changes.description = update.description;
        changes.category = update.category.map(|c| non_blank(Some(c)));
        changes.price = update.price;
        changes.min_stock = update.min_stock;
        changes.supplier = update.supplier.map(|s| non_blank(Some(s)));

        let mut tx = self.store.begin().await?;
        let current = tx
            .get_product(id)
            .await?
            .ok_or(InventoryError::NotFound(id))?;
        if let Some(price) = changes.price {
            check_stock_value(price, current.quantity)?;
        }
        if let Some(name) = &changes.name
            && let Some(other) = tx.get_product_by_name(name).await?
            && other.id != id
        {
            return Err(InventoryError::DuplicateName { name: name.clone() });
        }

        let product = tx
            .update_product(id, changes)
            .await?
            .ok_or(InventoryError::NotFound(id))?;
        tx.commit().await?;

        tracing::info!(product_id = %id, "Product updated");
        Ok(product)
    }

    /// Permanently removes a product. Its ledger entries are kept.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), InventoryError> {
        let result = match self.store.delete_product(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(InventoryError::NotFound(id)),
            Err(e) => Err(e.into()),
        };

        if result.is_ok() {
            metrics::counter!("inventory_products_deleted_total").increment(1);
            tracing::info!(product_id = %id, "Product deleted");
        }
        result.inspect_err(record_failure)
    }

    /// Moves stock in or out and records the movement in the ledger.
    ///
    /// Checks run in order: quantity, price, product existence, available
    /// stock for a stock-out, then that the new stock value is representable.
    #[tracing::instrument(skip(self))]
    pub async fn adjust_stock(
        &self,
        adjustment: StockAdjustment,
    ) -> Result<StockMovement, InventoryError> {
        self.adjust(adjustment).await.inspect_err(record_failure)
    }

    async fn adjust(&self, adjustment: StockAdjustment) -> Result<StockMovement, InventoryError> {
        let invalid_quantity = InventoryError::InvalidQuantity {
            quantity: adjustment.delta,
        };
        let delta = match u32::try_from(adjustment.delta) {
            Ok(delta) if delta > 0 => delta,
            _ => return Err(invalid_quantity),
        };
        if adjustment.unit_price.is_negative() {
            return Err(InventoryError::InvalidPrice {
                price: adjustment.unit_price,
            });
        }

        let id = adjustment.product_id;
        let now = timestamp_now();
        let mut tx = self.store.begin().await?;
        let current = tx
            .get_product(id)
            .await?
            .ok_or(InventoryError::NotFound(id))?;

        let quantity = match adjustment.direction {
            StockDirection::In => current
                .quantity
                .checked_add(delta)
                .ok_or(invalid_quantity)?,
            StockDirection::Out => current.quantity.checked_sub(delta).ok_or(
                InventoryError::InsufficientStock {
                    product_id: id,
                    requested: delta,
                    available: current.quantity,
                },
            )?,
        };
        check_stock_value(current.price, quantity)?;

        let product = tx
            .update_product(id, ProductChanges::touch(now).quantity(quantity))
            .await?
            .ok_or(InventoryError::NotFound(id))?;
        let transaction = self
            .ledger
            .append(
                tx.as_mut(),
                NewTransaction {
                    product_id: id,
                    kind: adjustment.direction.kind(),
                    quantity: delta,
                    unit_price: adjustment.unit_price,
                    notes: non_blank(adjustment.notes),
                    timestamp: now,
                },
            )
            .await?;
        tx.commit().await?;

        metrics::counter!(
            "inventory_stock_movements_total",
            "direction" => adjustment.direction.as_str()
        )
        .increment(1);
        tracing::info!(
            product_id = %id,
            direction = adjustment.direction.as_str(),
            delta,
            quantity,
            "Stock adjusted"
        );
        if product.is_low_stock() {
            tracing::warn!(
                product_id = %id,
                quantity = product.quantity,
                min_stock = product.min_stock,
                "Product is at or below its minimum stock"
            );
        }

        Ok(StockMovement {
            product,
            transaction,
        })
    }

    /// Receives stock for a product.
    pub async fn add_stock(
        &self,
        id: ProductId,
        quantity: i64,
        unit_price: Money,
        notes: Option<String>,
    ) -> Result<StockMovement, InventoryError> {
        let mut adjustment = StockAdjustment::stock_in(id, quantity).unit_price(unit_price);
        adjustment.notes = notes;
        self.adjust_stock(adjustment).await
    }

    /// Takes stock out of a product.
    pub async fn remove_stock(
        &self,
        id: ProductId,
        quantity: i64,
        unit_price: Money,
        notes: Option<String>,
    ) -> Result<StockMovement, InventoryError> {
        let mut adjustment = StockAdjustment::stock_out(id, quantity).unit_price(unit_price);
        adjustment.notes = notes;
        self.adjust_stock(adjustment).await
    }

    /// Returns every product ordered by name.
    pub async fn list_products(&self) -> Result<Vec<Product>, InventoryError> {
        Ok(self.store.list_products().await?)
    }

    /// Case-insensitive substring search over name, category and supplier.
    #[tracing::instrument(skip(self))]
    pub async fn search_products(&self, term: &str) -> Result<Vec<Product>, InventoryError> {
        Ok(self.store.search_products(term).await?)
    }

    /// Returns products at or below their minimum stock, ordered by name.
    pub async fn list_low_stock(&self) -> Result<Vec<Product>, InventoryError> {
        let mut products = self.store.list_products().await?;
        products.retain(Product::is_low_stock);
        Ok(products)
    }

    /// Returns ledger entries most recent first, optionally for one product.
    pub async fn transaction_history(
        &self,
        product_id: Option<ProductId>,
    ) -> Result<Vec<TransactionRecord>, InventoryError> {
        self.ledger.query_by(product_id).await
    }
}

/// Current time at the precision the store keeps.
fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Rejects stock whose total value can't be represented.
fn check_stock_value(price: Money, quantity: u32) -> Result<(), InventoryError> {
    match price.checked_mul(quantity) {
        Some(_) => Ok(()),
        None => Err(InventoryError::StockValueOverflow { price, quantity }),
    }
}

fn validate_name(name: &str) -> Result<String, InventoryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InventoryError::EmptyName);
    }
    Ok(name.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn record_failure(err: &InventoryError) {
    if err.is_rejection() {
        metrics::counter!("inventory_rejected_operations_total", "kind" => err.kind().as_str())
            .increment(1);
        tracing::warn!(kind = %err.kind(), error = %err, "Operation rejected");
    } else {
        tracing::error!(error = %err, "Store failure");
    }
}
