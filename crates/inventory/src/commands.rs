//! Inventory requests.

use store::{Money, ProductId, TransactionKind};

/// Request to add a product to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProductSpec {
    pub name: String,
    pub description: String,
    /// Blank categories are stored as no category.
    pub category: Option<String>,
    pub price: Money,
    /// Opening stock, recorded as the product's `INITIAL_STOCK` ledger entry.
    pub quantity: u32,
    pub min_stock: u32,
    pub supplier: Option<String>,
}

impl NewProductSpec {
    /// Threshold used when none is given.
    pub const DEFAULT_MIN_STOCK: u32 = 10;

    /// Creates a request with an empty description and the default threshold.
    pub fn new(name: impl Into<String>, price: Money, quantity: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: None,
            price,
            quantity,
            min_stock: Self::DEFAULT_MIN_STOCK,
            supplier: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn min_stock(mut self, min_stock: u32) -> Self {
        self.min_stock = min_stock;
        self
    }

    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }
}

/// Partial update of a product's descriptive fields.
///
/// Quantity is deliberately absent: stock only changes through
/// [`StockAdjustment`] so every change lands in the ledger. For category and
/// supplier a blank string clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Money>,
    pub min_stock: Option<u32>,
    pub supplier: Option<String>,
}

impl ProductUpdate {
    /// Creates an update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    pub fn min_stock(mut self, min_stock: u32) -> Self {
        self.min_stock = Some(min_stock);
        self
    }

    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    /// Returns true when no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.min_stock.is_none()
            && self.supplier.is_none()
    }
}

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockDirection {
    In,
    Out,
}

impl StockDirection {
    /// Returns the ledger entry kind for this direction.
    pub fn kind(&self) -> TransactionKind {
        match self {
            StockDirection::In => TransactionKind::StockIn,
            StockDirection::Out => TransactionKind::StockOut,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockDirection::In => "in",
            StockDirection::Out => "out",
        }
    }
}

/// Request to move stock in or out of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAdjustment {
    pub product_id: ProductId,
    pub direction: StockDirection,
    /// Units to move. Must be positive.
    pub delta: i64,
    /// Price per unit for the ledger. Zero means not recorded.
    pub unit_price: Money,
    pub notes: Option<String>,
}

impl StockAdjustment {
    /// Creates a stock-in request.
    pub fn stock_in(product_id: ProductId, delta: i64) -> Self {
        Self::new(product_id, StockDirection::In, delta)
    }

    /// Creates a stock-out request.
    pub fn stock_out(product_id: ProductId, delta: i64) -> Self {
        Self::new(product_id, StockDirection::Out, delta)
    }

    fn new(product_id: ProductId, direction: StockDirection, delta: i64) -> Self {
        Self {
            product_id,
            direction,
            delta,
            unit_price: Money::zero(),
            notes: None,
        }
    }

    pub fn unit_price(mut self, unit_price: Money) -> Self {
        self.unit_price = unit_price;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_defaults() {
        let spec = NewProductSpec::new("Laptop", Money::from_cents(99999), 15);
        assert_eq!(spec.min_stock, NewProductSpec::DEFAULT_MIN_STOCK);
        assert!(spec.description.is_empty());
        assert!(spec.category.is_none());
        assert!(spec.supplier.is_none());
    }

    #[test]
    fn empty_update() {
        assert!(ProductUpdate::new().is_empty());
        assert!(!ProductUpdate::new().min_stock(3).is_empty());
        assert!(!ProductUpdate::new().category("").is_empty());
    }

    #[test]
    fn adjustment_builders() {
        let adj = StockAdjustment::stock_out(ProductId::new(2), 5)
            .unit_price(Money::from_cents(125))
            .notes("Sold");
        assert_eq!(adj.direction, StockDirection::Out);
        assert_eq!(adj.direction.kind(), TransactionKind::StockOut);
        assert_eq!(adj.unit_price.cents(), 125);
        assert_eq!(adj.notes.as_deref(), Some("Sold"));

        let adj = StockAdjustment::stock_in(ProductId::new(2), 5);
        assert!(adj.unit_price.is_zero());
        assert_eq!(adj.direction.kind(), TransactionKind::StockIn);
    }
}
