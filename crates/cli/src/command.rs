//! Parsing of interactive command lines.
//!
//! Fields for `add` and `update` are given as `key=value` pairs. Values
//! containing spaces can be quoted: `name="Coffee Beans"`.

use common::{Money, MoneyParseError, ProductId};
use inventory::{NewProductSpec, ProductUpdate, StockAdjustment};
use thiserror::Error;

/// Errors produced while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}' (type 'help' for a list)")]
    Unknown(String),

    #[error("Missing {0}")]
    MissingArgument(&'static str),

    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("Invalid {field}: '{value}' is not a whole number")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid {field}: {source}")]
    InvalidAmount {
        field: &'static str,
        #[source]
        source: MoneyParseError,
    },

    #[error("Expected key=value, got '{0}'")]
    ExpectedField(String),

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Search term must not be empty")]
    EmptySearchTerm,

    #[error("Unterminated quote")]
    UnterminatedQuote,
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Show(ProductId),
    Search(String),
    Add(NewProductSpec),
    Update(ProductId, ProductUpdate),
    Delete(ProductId),
    Adjust(StockAdjustment),
    Low,
    History(Option<ProductId>),
    Report,
    Help,
    Quit,
}

impl Command {
    /// Parses a line. Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let tokens = tokenize(line)?;
        let Some((name, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "list" | "ls" => no_args(args, Command::List)?,
            "show" => Command::Show(single_id(args)?),
            "search" => {
                let term = args.join(" ");
                if term.trim().is_empty() {
                    return Err(CommandError::EmptySearchTerm);
                }
                Command::Search(term)
            }
            "add" => Command::Add(parse_new_product(args)?),
            "update" => {
                let (id, fields) = args
                    .split_first()
                    .ok_or(CommandError::MissingArgument("product id"))?;
                Command::Update(parse_id(id)?, parse_update(fields)?)
            }
            "delete" | "rm" => Command::Delete(single_id(args)?),
            "in" => Command::Adjust(parse_adjustment(args, StockAdjustment::stock_in)?),
            "out" => Command::Adjust(parse_adjustment(args, StockAdjustment::stock_out)?),
            "low" => no_args(args, Command::Low)?,
            "history" => match args {
                [] => Command::History(None),
                [id] => Command::History(Some(parse_id(id)?)),
                [_, extra, ..] => return Err(CommandError::UnexpectedArgument(extra.clone())),
            },
            "report" => no_args(args, Command::Report)?,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

/// Usage text shown by `help`.
pub const HELP: &str = "\
Commands:
  list                              List all products
  show <id>                         Show one product
  search <term>                     Search name, category and supplier
  add name=<name> price=<amount> [qty=<n>] [min=<n>]
      [category=<c>] [supplier=<s>] [description=<d>]
                                    Add a product
  update <id> <field>=<value>...    Change name, price, min, category,
                                    supplier or description
  delete <id>                       Delete a product (its history is kept)
  in <id> <qty> [price] [notes]     Receive stock
  out <id> <qty> [price] [notes]    Remove stock
  low                               List products at or below minimum stock
  history [id]                      Show the 20 most recent movements
  report                            Inventory report as JSON
  help                              Show this text
  quit                              Exit

Quote values containing spaces: name=\"Coffee Beans\"";

fn no_args(args: &[String], command: Command) -> Result<Command, CommandError> {
    match args.first() {
        Some(extra) => Err(CommandError::UnexpectedArgument(extra.clone())),
        None => Ok(command),
    }
}

fn single_id(args: &[String]) -> Result<ProductId, CommandError> {
    match args {
        [] => Err(CommandError::MissingArgument("product id")),
        [id] => parse_id(id),
        [_, extra, ..] => Err(CommandError::UnexpectedArgument(extra.clone())),
    }
}

fn parse_id(value: &str) -> Result<ProductId, CommandError> {
    value
        .parse::<i64>()
        .map(ProductId::new)
        .map_err(|_| CommandError::InvalidNumber {
            field: "product id",
            value: value.to_string(),
        })
}

fn parse_count(field: &'static str, value: &str) -> Result<u32, CommandError> {
    value.parse().map_err(|_| CommandError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_amount(field: &'static str, value: &str) -> Result<Money, CommandError> {
    Money::from_decimal_str(value).map_err(|source| CommandError::InvalidAmount { field, source })
}

fn fields(args: &[String]) -> Result<Vec<(String, &str)>, CommandError> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(key, value)| (key.to_ascii_lowercase(), value))
                .ok_or_else(|| CommandError::ExpectedField(arg.clone()))
        })
        .collect()
}

fn parse_new_product(args: &[String]) -> Result<NewProductSpec, CommandError> {
    let mut name = None;
    let mut price = None;
    let mut quantity = 0;
    let mut min_stock = NewProductSpec::DEFAULT_MIN_STOCK;
    let mut category = None;
    let mut supplier = None;
    let mut description = String::new();

    for (key, value) in fields(args)? {
        match key.as_str() {
            "name" => name = Some(value.to_string()),
            "price" => price = Some(parse_amount("price", value)?),
            "qty" | "quantity" => quantity = parse_count("quantity", value)?,
            "min" | "min_stock" => min_stock = parse_count("minimum stock", value)?,
            "category" => category = Some(value.to_string()),
            "supplier" => supplier = Some(value.to_string()),
            "description" => description = value.to_string(),
            _ => return Err(CommandError::UnknownField(key)),
        }
    }

    let name = name.ok_or(CommandError::MissingArgument("name"))?;
    let price = price.ok_or(CommandError::MissingArgument("price"))?;

    let mut spec = NewProductSpec::new(name, price, quantity)
        .description(description)
        .min_stock(min_stock);
    spec.category = category;
    spec.supplier = supplier;
    Ok(spec)
}

fn parse_update(args: &[String]) -> Result<ProductUpdate, CommandError> {
    let mut update = ProductUpdate::new();
    for (key, value) in fields(args)? {
        update = match key.as_str() {
            "name" => update.name(value),
            "price" => update.price(parse_amount("price", value)?),
            "min" | "min_stock" => update.min_stock(parse_count("minimum stock", value)?),
            "category" => update.category(value),
            "supplier" => update.supplier(value),
            "description" => update.description(value),
            _ => return Err(CommandError::UnknownField(key)),
        };
    }
    Ok(update)
}

/// `<id> <qty> [price] [notes...]`. A third token that parses as an amount
/// is the unit price; everything after is notes.
fn parse_adjustment(
    args: &[String],
    build: fn(ProductId, i64) -> StockAdjustment,
) -> Result<StockAdjustment, CommandError> {
    let [id, quantity, rest @ ..] = args else {
        return Err(CommandError::MissingArgument(if args.is_empty() {
            "product id"
        } else {
            "quantity"
        }));
    };

    let id = parse_id(id)?;
    let quantity = quantity
        .parse::<i64>()
        .map_err(|_| CommandError::InvalidNumber {
            field: "quantity",
            value: quantity.clone(),
        })?;

    let mut adjustment = build(id, quantity);
    let notes = match rest.split_first() {
        Some((first, notes)) => match Money::from_decimal_str(first) {
            Ok(price) => {
                adjustment = adjustment.unit_price(price);
                notes.join(" ")
            }
            Err(_) => rest.join(" "),
        },
        None => String::new(),
    };
    if !notes.trim().is_empty() {
        adjustment = adjustment.notes(notes);
    }
    Ok(adjustment)
}

/// Splits on whitespace, keeping double-quoted runs together.
fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                started = true;
            }
            c if c.is_whitespace() && !quoted => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }

    if quoted {
        return Err(CommandError::UnterminatedQuote);
    }
    if started {
        tokens.push(current);
    }
    Ok(tokens)
}
