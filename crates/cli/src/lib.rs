//! Interactive front end for the inventory tracker.
//!
//! Reads one command per line, runs it against the inventory core and prints
//! the result. All business rules live in the `inventory` crate; this crate
//! only parses input and renders output.

pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod render;

pub use app::{App, HISTORY_LIMIT, Reply};
pub use command::{Command, CommandError};
pub use config::{Config, LogFormat, StoreBackend};
pub use error::CliError;
