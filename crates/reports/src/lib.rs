//! Read-only reports over the product catalog.
//!
//! Reports are computed from a single read of the products. The ledger is
//! never consulted.

pub mod error;
pub mod report;

pub use error::{ReportError, Result};
pub use report::{CategorySummary, InventoryReport, ReportEngine, UNCATEGORIZED};
