//! Inventory tracker entry point.

use std::io::Write;

use cli::{App, CliError, Config, LogFormat, Reply, StoreBackend};
use inventory::{InMemoryStore, InventoryStore, SqliteStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so command output stays clean.
    match config.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "inventory> ")?;
    stdout.flush()
}

async fn run<S: InventoryStore>(app: App<S>) -> Result<(), CliError> {
    println!("Inventory tracker. Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        match app.handle_line(&line).await {
            Ok(Reply::Quit) => break,
            Ok(Reply::Output(output)) => {
                if !output.is_empty() {
                    println!("{output}");
                }
            }
            Err(err) if err.is_recoverable() => println!("Error: {err}"),
            Err(err) => return Err(err),
        }
        prompt()?;
    }

    tracing::info!("session ended");
    Ok(())
}

#[tokio::main]
async fn main() {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    init_tracing(&config);

    // 2. Open the store and run the session
    let result = match config.backend() {
        StoreBackend::Memory => {
            tracing::info!("using in-memory store");
            run(App::new(InMemoryStore::new())).await
        }
        StoreBackend::Sqlite(url) => match open_sqlite(&url).await {
            Ok(store) => run(App::new(store)).await,
            Err(err) => Err(err),
        },
    };

    if let Err(err) = result {
        tracing::error!(error = %err, "inventory tracker stopped");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn open_sqlite(url: &str) -> Result<SqliteStore, CliError> {
    tracing::info!(%url, "opening SQLite store");
    let store = SqliteStore::connect(url).await?;
    store.run_migrations().await?;
    Ok(store)
}
