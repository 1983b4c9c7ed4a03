//! # Database Configuration
//!
//! Pool settings, built in code or loaded from environment variables.
//!
//! ## Environment Variables
//! | Variable                       | Default            |
//! |--------------------------------|--------------------|
//! | `AGRO_DATABASE_PATH`           | `./agro_dev.db`    |
//! | `AGRO_DB_MAX_CONNECTIONS`      | `5`                |
//! | `AGRO_DB_MIN_CONNECTIONS`      | `1`                |
//! | `AGRO_DB_CONNECT_TIMEOUT_SECS` | `30`               |
//! | `AGRO_DB_RUN_MIGRATIONS`       | `true`             |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_DATABASE_PATH: &str = "./agro_dev.db";

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },

    #[error("Invalid configuration: {0}")]
    Inconsistent(String),
}

/// Database configuration.
///
/// ## Example
/// ```rust
/// use agro_db::DbConfig;
///
/// let config = DbConfig::new("/path/to/agro.db")
///     .max_connections(5)
///     .min_connections(1);
/// assert_eq!(config.max_connections, 5);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created on connect if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Fresh, isolated schema per call
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    /// Returns true for the `:memory:` path.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }

    /// Loads configuration from `AGRO_*` environment variables.
    ///
    /// Unset variables keep their defaults; set but unparsable ones are an
    /// error rather than silently ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`DbConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup("AGRO_DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.into());
        let mut config = DbConfig::new(path);

        if let Some(max) = parse_var::<u32, _>(&lookup, "AGRO_DB_MAX_CONNECTIONS")? {
            config.max_connections = max;
        }

        if let Some(min) = parse_var::<u32, _>(&lookup, "AGRO_DB_MIN_CONNECTIONS")? {
            config.min_connections = min;
        }

        if let Some(secs) = parse_var::<u64, _>(&lookup, "AGRO_DB_CONNECT_TIMEOUT_SECS")? {
            config.connect_timeout = Duration::from_secs(secs);
        }

        if let Some(run) = parse_var::<bool, _>(&lookup, "AGRO_DB_RUN_MIGRATIONS")? {
            config.run_migrations = run;
        }

        if config.max_connections == 0 {
            return Err(ConfigError::Inconsistent(
                "AGRO_DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        if config.min_connections > config.max_connections {
            return Err(ConfigError::Inconsistent(format!(
                "AGRO_DB_MIN_CONNECTIONS ({}) exceeds AGRO_DB_MAX_CONNECTIONS ({})",
                config.min_connections, config.max_connections
            )));
        }

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value: raw,
            }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
