//! Shared types for the inventory tracker.

mod money;
mod types;

pub use money::{Money, MoneyParseError};
pub use types::{ProductId, TransactionId};
