//! Connection settings for [`Orm`](crate::Orm).
//!
//! Deserializable from any serde format; missing fields take their defaults.
//!
//! ```json
//! {
//!   "database_url": "postgres://postgres@localhost:5432/postgres",
//!   "max_connections": 5,
//!   "dialect": "postgres"
//! }
//! ```

use std::env;

use serde::{Deserialize, Serialize};

use crate::libs::dialect::Dialect;
use crate::libs::error::{Error, Result};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrmConfig {
    pub database_url: String,
    /// Pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Overrides the dialect otherwise read from the URL scheme.
    #[serde(default)]
    pub dialect: Option<Dialect>,
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

impl OrmConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            dialect: None,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Reads `DATABASE_URL`, `FLATORM_MAX_CONNECTIONS` and `FLATORM_DIALECT`.
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| Error::Config("DATABASE_URL is not set".into()))?;
        let mut config = Self::new(database_url);

        if let Ok(raw) = env::var("FLATORM_MAX_CONNECTIONS") {
            config.max_connections = raw.parse().map_err(|_| {
                Error::Config(format!("FLATORM_MAX_CONNECTIONS is not a number: {raw}"))
            })?;
        }
        if let Ok(raw) = env::var("FLATORM_DIALECT") {
            config.dialect = Some(raw.parse()?);
        }
        Ok(config)
    }

    /// The configured dialect, or the one named by the URL scheme.
    pub fn resolve_dialect(&self) -> Result<Dialect> {
        if let Some(dialect) = self.dialect {
            return Ok(dialect);
        }
        Dialect::from_url(&self.database_url)
            .ok_or_else(|| Error::UnsupportedDialect(self.database_url.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let config: OrmConfig =
            serde_json::from_str(r#"{"database_url": "sqlite::memory:"}"#).unwrap();
        assert_eq!(config, OrmConfig::new("sqlite::memory:"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.resolve_dialect().unwrap(), Dialect::Sqlite);
    }

    #[test]
    fn explicit_dialect_wins_over_url() {
        let config: OrmConfig = serde_json::from_str(
            r#"{"database_url": "postgresql://localhost/db", "max_connections": 2, "dialect": "mysql"}"#,
        )
        .unwrap();
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.resolve_dialect().unwrap(), Dialect::Mysql);
    }

    #[test]
    fn unknown_scheme_is_unsupported() {
        let config = OrmConfig::new("mssql://localhost/db").with_max_connections(1);
        assert!(matches!(
            config.resolve_dialect(),
            Err(Error::UnsupportedDialect(_))
        ));
        let config = config.with_dialect(Dialect::Postgres);
        assert_eq!(config.resolve_dialect().unwrap(), Dialect::Postgres);
    }
}
