//! Application configuration loaded from environment variables.

/// Value of `DATABASE_URL` that selects the in-memory store.
pub const MEMORY_DATABASE: &str = "memory";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Where products and the ledger are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sqlite(String),
}

/// Front-end configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `DATABASE_URL`: SQLite URL, or `memory` (default: `"sqlite://inventory.db?mode=rwc"`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    pub const DEFAULT_DATABASE_URL: &'static str = "sqlite://inventory.db?mode=rwc";

    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Loads configuration through the given variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            database_url: var("DATABASE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.database_url),
            log_level: var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: var("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.log_format),
        }
    }

    /// Returns the store selected by `database_url`.
    pub fn backend(&self) -> StoreBackend {
        if self.database_url.eq_ignore_ascii_case(MEMORY_DATABASE) {
            StoreBackend::Memory
        } else {
            StoreBackend::Sqlite(self.database_url.clone())
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: Self::DEFAULT_DATABASE_URL.to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
