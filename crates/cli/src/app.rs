//! Executes parsed commands against the inventory.

use inventory::{InventoryError, InventoryManager, InventoryStore, TransactionQuery};
use reports::ReportEngine;

use crate::command::{Command, HELP};
use crate::error::CliError;
use crate::render;

/// Number of ledger entries shown by `history`.
pub const HISTORY_LIMIT: usize = 20;

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// The front end's handle on the inventory core.
pub struct App<S: InventoryStore> {
    manager: InventoryManager<S>,
    reports: ReportEngine<S>,
}

impl<S: InventoryStore + Clone> App<S> {
    /// Creates an app over the given store.
    pub fn new(store: S) -> Self {
        Self {
            manager: InventoryManager::new(store.clone()),
            reports: ReportEngine::new(store),
        }
    }
}

impl<S: InventoryStore> App<S> {
    /// Returns the inventory manager.
    pub fn manager(&self) -> &InventoryManager<S> {
        &self.manager
    }

    /// Parses and runs one input line.
    pub async fn handle_line(&self, line: &str) -> Result<Reply, CliError> {
        match Command::parse(line)? {
            Some(command) => self.execute(command).await,
            None => Ok(Reply::Output(String::new())),
        }
    }

    /// Runs a parsed command and renders its result.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, command: Command) -> Result<Reply, CliError> {
        let output = match command {
            Command::List => render::product_table(&self.manager.list_products().await?),
            Command::Show(id) => {
                let product = self
                    .manager
                    .get_product(id)
                    .await?
                    .ok_or(InventoryError::NotFound(id))?;
                render::product_detail(&product)
            }
            Command::Search(term) => {
                render::product_table(&self.manager.search_products(&term).await?)
            }
            Command::Add(spec) => {
                let product = self.manager.add_product(spec).await?;
                format!("Added '{}' with id {}", product.name, product.id)
            }
            Command::Update(id, update) => {
                let product = self.manager.update_product(id, update).await?;
                format!("Updated '{}'", product.name)
            }
            Command::Delete(id) => {
                self.manager.delete_product(id).await?;
                format!("Deleted product {id}")
            }
            Command::Adjust(adjustment) => {
                render::movement(&self.manager.adjust_stock(adjustment).await?)
            }
            Command::Low => {
                let products = self.manager.list_low_stock().await?;
                if products.is_empty() {
                    "All products are above their minimum stock.".to_string()
                } else {
                    render::product_table(&products)
                }
            }
            Command::History(product_id) => {
                let query = TransactionQuery::new()
                    .product_id(product_id)
                    .limit(HISTORY_LIMIT);
                render::history_table(&self.manager.ledger().query(query).await?)
            }
            Command::Report => {
                let report = self.reports.generate_report().await?;
                serde_json::to_string_pretty(&report)?
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };

        Ok(Reply::Output(output))
    }
}
