//! Plain-text rendering of products and ledger entries.

use std::fmt::Write;

use inventory::{Product, StockMovement, TransactionKind, TransactionRecord};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut clipped: String = value.chars().take(width.saturating_sub(1)).collect();
        clipped.push('…');
        clipped
    }
}

/// Renders products as a table, flagging those at or below minimum stock.
pub fn product_table(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found.".to_string();
    }

    let mut out = format!(
        "{:>5}  {:<25}  {:<15}  {:>10}  {:>6}  {:>6}  {:<15}\n",
        "ID", "Name", "Category", "Price", "Qty", "Min", "Supplier"
    );
    out.push_str(&"-".repeat(96));
    for p in products {
        let _ = write!(
            out,
            "\n{:>5}  {:<25}  {:<15}  {:>10}  {:>6}  {:>6}  {:<15}",
            p.id.to_string(),
            clip(&p.name, 25),
            clip(p.category.as_deref().unwrap_or("-"), 15),
            p.price.to_string(),
            p.quantity,
            p.min_stock,
            clip(p.supplier.as_deref().unwrap_or("-"), 15),
        );
        if p.is_low_stock() {
            out.push_str("  LOW");
        }
    }
    out
}

/// Renders every field of one product.
pub fn product_detail(p: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:           {}", p.id);
    let _ = writeln!(out, "Name:         {}", p.name);
    let _ = writeln!(out, "Description:  {}", p.description);
    let _ = writeln!(out, "Category:     {}", p.category.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Price:        {}", p.price);
    let _ = writeln!(out, "Quantity:     {}", p.quantity);
    let _ = writeln!(out, "Min stock:    {}", p.min_stock);
    let _ = writeln!(out, "Supplier:     {}", p.supplier.as_deref().unwrap_or("-"));
    match p.stock_value() {
        Some(value) => {
            let _ = writeln!(out, "Stock value:  {value}");
        }
        None => {
            let _ = writeln!(out, "Stock value:  too large to display");
        }
    }
    let _ = writeln!(out, "Created:      {}", p.created_at.format(DATE_FORMAT));
    let _ = write!(out, "Last updated: {}", p.last_updated.format(DATE_FORMAT));
    if p.is_low_stock() {
        let _ = write!(out, "\nLOW STOCK: {} below minimum", p.shortage());
    }
    out
}

/// Renders ledger entries. Entries of deleted products show the old id.
pub fn history_table(records: &[TransactionRecord]) -> String {
    if records.is_empty() {
        return "No transactions found.".to_string();
    }

    let mut out = format!(
        "{:<16}  {:<25}  {:<13}  {:>6}  {:>10}  {}\n",
        "Date", "Product", "Type", "Qty", "Unit Price", "Notes"
    );
    out.push_str(&"-".repeat(96));
    for r in records {
        let t = &r.transaction;
        let product = match &r.product_name {
            Some(name) => clip(name, 25),
            None => format!("(deleted #{})", t.product_id),
        };
        let _ = write!(
            out,
            "\n{:<16}  {:<25}  {:<13}  {:>6}  {:>10}  {}",
            t.timestamp.format(DATE_FORMAT).to_string(),
            product,
            t.kind.as_str(),
            t.quantity,
            t.unit_price.to_string(),
            t.notes.as_deref().unwrap_or(""),
        );
    }
    out
}

/// Summarizes a stock adjustment.
pub fn movement(m: &StockMovement) -> String {
    let verb = match m.transaction.kind {
        TransactionKind::StockOut => "out",
        _ => "in",
    };
    let mut out = format!(
        "Stock {}: {} units of {}. New quantity: {}",
        verb,
        m.transaction.quantity,
        m.product.name,
        m.product.quantity
    );
    if m.product.is_low_stock() {
        let _ = write!(
            out,
            "\nWarning: {} is at or below its minimum stock of {}",
            m.product.name, m.product.min_stock
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use inventory::{Money, ProductId, Transaction, TransactionId};

    use super::*;

    fn product(quantity: u32) -> Product {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        Product {
            id: ProductId::new(1),
            name: "Laptop".to_string(),
            description: "15 inch".to_string(),
            category: Some("Electronics".to_string()),
            price: Money::from_cents(99999),
            quantity,
            min_stock: 5,
            supplier: None,
            created_at: ts,
            last_updated: ts,
        }
    }

    fn record(name: Option<&str>) -> TransactionRecord {
        TransactionRecord {
            transaction: Transaction {
                id: TransactionId::new(1),
                product_id: ProductId::new(9),
                kind: TransactionKind::StockIn,
                quantity: 4,
                unit_price: Money::from_cents(250),
                notes: Some("Restock".to_string()),
                timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            },
            product_name: name.map(str::to_string),
        }
    }

    #[test]
    fn empty_tables() {
        assert_eq!(product_table(&[]), "No products found.");
        assert_eq!(history_table(&[]), "No transactions found.");
    }

    #[test]
    fn low_stock_is_flagged() {
        assert!(product_table(&[product(5)]).ends_with("LOW"));
        assert!(!product_table(&[product(6)]).ends_with("LOW"));
        assert!(product_detail(&product(2)).contains("LOW STOCK: 3 below minimum"));
    }

    #[test]
    fn detail_shows_value() {
        let detail = product_detail(&product(15));
        assert!(detail.contains("Stock value:  $14999.85"));
        assert!(detail.contains("Supplier:     -"));
        assert!(detail.contains("Created:      2024-03-01 09:30"));
    }

    #[test]
    fn detail_survives_unrepresentable_value() {
        let mut p = product(u32::MAX);
        p.price = Money::from_cents(i64::MAX / 2);
        assert!(product_detail(&p).contains("Stock value:  too large to display"));
    }

    #[test]
    fn orphaned_entries_show_old_id() {
        let table = history_table(&[record(None)]);
        assert!(table.contains("(deleted #9)"));
        assert!(history_table(&[record(Some("Laptop"))]).contains("Laptop"));
    }

    #[test]
    fn clip_long_values() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("abcdefghij", 5), "abcd…");
    }
}
