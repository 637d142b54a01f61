//! Inventory valuation report.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use common::Money;
use serde::Serialize;
use store::{InventoryStore, Product};

use crate::{ReportError, Result};

/// Bucket for products without a category. Only ever used in reports.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Product count and stock value for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub count: u64,
    pub total_value: Money,
}

/// Snapshot summary of the whole inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryReport {
    pub total_products: u64,
    /// Σ price × quantity, exact to the cent.
    pub total_inventory_value: Money,
    pub low_stock_count: u64,
    /// Keyed by category name, ordered by name.
    pub categories: BTreeMap<String, CategorySummary>,
    /// Ordered by product name.
    pub low_stock_products: Vec<Product>,
    pub generated_at: DateTime<Utc>,
}

impl InventoryReport {
    /// Builds a report from products already ordered by name.
    ///
    /// Fails if any stock value or total overflows.
    pub fn from_products(products: Vec<Product>, generated_at: DateTime<Utc>) -> Result<Self> {
        let mut total_inventory_value = Money::zero();
        let mut categories: BTreeMap<String, CategorySummary> = BTreeMap::new();

        for product in &products {
            let value = product
                .stock_value()
                .ok_or_else(|| overflow(format!("product {}", product.id)))?;
            total_inventory_value = total_inventory_value
                .checked_add(value)
                .ok_or_else(|| overflow("the inventory".to_string()))?;

            let key = match product.category.as_deref() {
                Some(category) if !category.trim().is_empty() => category,
                _ => UNCATEGORIZED,
            };
            let summary = categories.entry(key.to_string()).or_default();
            summary.count += 1;
            summary.total_value = summary
                .total_value
                .checked_add(value)
                .ok_or_else(|| overflow(format!("category '{key}'")))?;
        }

        let total_products = products.len() as u64;
        let low_stock_products: Vec<Product> =
            products.into_iter().filter(Product::is_low_stock).collect();

        Ok(Self {
            total_products,
            total_inventory_value,
            low_stock_count: low_stock_products.len() as u64,
            categories,
            low_stock_products,
            generated_at,
        })
    }
}

fn overflow(context: String) -> ReportError {
    ReportError::ValueOverflow { context }
}

/// Computes reports from the store.
pub struct ReportEngine<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> ReportEngine<S> {
    /// Creates a new report engine over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Generates a report from the current products.
    #[tracing::instrument(skip(self))]
    pub async fn generate_report(&self) -> Result<InventoryReport> {
        let products = self.store.list_products().await?;
        let report = InventoryReport::from_products(products, Utc::now())?;

        metrics::counter!("reports_generated_total").increment(1);
        tracing::info!(
            total_products = report.total_products,
            total_value = %report.total_inventory_value,
            low_stock = report.low_stock_count,
            "Report generated"
        );

        Ok(report)
    }
}
