//! # Configuration
//!
//! [`Settings`] are read from an optional TOML file and then from environment
//! variables prefixed with `CRUDKIT`, which win over the file. Nested keys are
//! separated by a double underscore:
//!
//! ```text
//! CRUDKIT__DATABASE__URL=postgres://localhost/notes  ->  database.url
//! CRUDKIT__LOGGING__JSON=true                        ->  logging.json
//! ```
//!
//! Every key has a default, so an empty configuration is valid.

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, builder::DefaultState};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "CRUDKIT";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Seconds to wait for a connection
    pub connect_timeout: u64,
    /// Log every SQL statement
    pub sqlx_logging: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: 30,
            sqlx_logging: false,
        }
    }
}

impl DatabaseSettings {
    #[must_use]
    pub fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.url.clone());
        options
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout))
            .sqlx_logging(self.sqlx_logging);
        options
    }

    /// # Errors
    ///
    /// Returns `DbErr` when the database cannot be reached.
    pub async fn connect(&self) -> Result<DatabaseConnection, DbErr> {
        tracing::info!(
            max_connections = self.max_connections,
            min_connections = self.min_connections,
            "Connecting to database"
        );
        Database::connect(self.connect_options()).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `crudkit=debug,sea_orm=warn`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Load settings from `path` (when given and present) and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the file or a variable cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = Config::builder();
        let builder = match path {
            Some(path) => builder.add_source(File::from(path).format(FileFormat::Toml).required(false)),
            None => builder,
        };
        Self::build(builder, env_source())
    }

    /// Parse settings from TOML text, still overridden by the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the text cannot be parsed.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Self::build(
            Config::builder().add_source(File::from_str(text, FileFormat::Toml)),
            env_source(),
        )
    }

    fn build(builder: ConfigBuilder<DefaultState>, env: Environment) -> Result<Self, ConfigError> {
        builder.add_source(env).build()?.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .ignore_empty(true)
        .try_parsing(true)
}
