//! Data source registry: one SeaORM connection pool per logical key.
//!
//! Built once at startup from [`Config`] and immutable afterwards. Each entry
//! maps a [`DataSourceKey`] to a pooled [`DatabaseConnection`]; pooling
//! itself (wait queues, max-size backpressure, acquisition timeouts) is the
//! pool's concern, not the registry's. Supported backends:
//! - SQLite (with auto-creation of missing database files)
//! - PostgreSQL
//! - MySQL

use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{debug, info};

use crate::config::{Config, DataSourceConfig, defaults::DEFAULT_MAX_CONNECTIONS};
use crate::errors::{RegistryError, RegistryResult};
use crate::key::DataSourceKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    SQLite,
    PostgreSQL,
    MySQL,
}

impl DatabaseType {
    /// Detect the database type from the URL
    pub fn detect(url: &str) -> RegistryResult<DatabaseType> {
        if url.starts_with("sqlite:") {
            Ok(DatabaseType::SQLite)
        } else if url.starts_with("postgres:") || url.starts_with("postgresql:") {
            Ok(DatabaseType::PostgreSQL)
        } else if url.starts_with("mysql:") {
            Ok(DatabaseType::MySQL)
        } else {
            Err(RegistryError::configuration(format!(
                "unsupported database URL format: {url}"
            )))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::SQLite => "SQLite",
            DatabaseType::PostgreSQL => "PostgreSQL",
            DatabaseType::MySQL => "MySQL",
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable key -> pool mapping with a designated default key.
#[derive(Debug)]
pub struct DataSourceRegistry {
    pools: HashMap<DataSourceKey, Arc<DatabaseConnection>>,
    default_key: DataSourceKey,
}

impl DataSourceRegistry {
    /// Connect every configured data source and build the registry.
    ///
    /// Fails fast: a single unreachable source aborts startup rather than
    /// leaving a key that would surface as `UnknownKey` at request time.
    pub async fn connect(config: &Config) -> RegistryResult<Self> {
        config
            .validate()
            .map_err(RegistryError::configuration)?;

        let mut pools = HashMap::new();
        for (name, source) in &config.data_sources {
            let key = DataSourceKey::new(name.clone());
            let connection = Self::connect_source(&key, source).await?;
            pools.insert(key, Arc::new(connection));
        }

        let default_key = DataSourceKey::new(config.default_data_source.clone());
        info!(
            "data source registry ready: {} pools, default '{}'",
            pools.len(),
            default_key
        );
        Ok(Self { pools, default_key })
    }

    /// Assemble a registry from pre-built connections.
    ///
    /// Used by tests and by embedders that manage their own pools.
    pub fn from_connections(
        pools: HashMap<DataSourceKey, Arc<DatabaseConnection>>,
        default_key: DataSourceKey,
    ) -> RegistryResult<Self> {
        if !pools.contains_key(&default_key) {
            return Err(RegistryError::configuration(format!(
                "default data source '{default_key}' has no registered pool"
            )));
        }
        Ok(Self { pools, default_key })
    }

    async fn connect_source(
        key: &DataSourceKey,
        source: &DataSourceConfig,
    ) -> RegistryResult<DatabaseConnection> {
        let database_type = DatabaseType::detect(&source.url)?;
        info!("connecting data source '{}' ({})", key, database_type);

        // For SQLite, modify URL to enable auto-creation if needed
        let connection_url = match database_type {
            DatabaseType::SQLite => ensure_sqlite_auto_creation(&source.url)?,
            _ => source.url.clone(),
        };

        let mut connect_options = ConnectOptions::new(&connection_url);
        connect_options
            .max_connections(source.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS))
            .min_connections(1)
            .connect_timeout(Duration::from_secs(source.connect_timeout))
            .acquire_timeout(Duration::from_secs(source.acquire_timeout))
            .idle_timeout(Duration::from_secs(source.idle_timeout))
            .max_lifetime(Duration::from_secs(source.max_lifetime));

        match Database::connect(connect_options).await {
            Ok(connection) => {
                debug!("data source '{}' connection established", key);
                Ok(connection)
            }
            Err(e) => {
                tracing::error!("data source '{}' connection failed: {:?}", key, e);
                let mut chain = e.source();
                let mut level = 0;
                while let Some(err) = chain {
                    tracing::error!("  level {}: {}", level, err);
                    chain = err.source();
                    level += 1;
                }
                Err(RegistryError::Connection {
                    key: key.clone(),
                    source: e,
                })
            }
        }
    }

    /// Look up the pool for `key`.
    ///
    /// Idempotent: returns the same handle on every call for the lifetime of
    /// the process. An unregistered key is an error, never a silent fallback
    /// to the default pool.
    pub fn resolve(&self, key: &DataSourceKey) -> RegistryResult<Arc<DatabaseConnection>> {
        self.pools
            .get(key)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownKey { key: key.clone() })
    }

    pub fn default_key(&self) -> &DataSourceKey {
        &self.default_key
    }

    pub fn keys(&self) -> impl Iterator<Item = &DataSourceKey> {
        self.pools.keys()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

/// Ensure SQLite URL includes auto-creation mode if needed
fn ensure_sqlite_auto_creation(url: &str) -> RegistryResult<String> {
    // Fast path: if URL already has mode parameter or is in-memory, use as-is
    if url.contains("mode=") || url.contains(":memory:") {
        return Ok(url.to_string());
    }

    let file_path = if let Some(path) = url.strip_prefix("sqlite://") {
        path
    } else if let Some(path) = url.strip_prefix("sqlite:") {
        path
    } else {
        return Err(RegistryError::configuration(format!(
            "invalid SQLite URL format: {url}"
        )));
    };

    let path = std::path::Path::new(file_path);
    if path.exists() {
        return Ok(url.to_string());
    }

    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            RegistryError::configuration(format!(
                "failed to create directory for SQLite database {}: {e}",
                parent.display()
            ))
        })?;
        info!("Created directory for SQLite database: {}", parent.display());
    }

    // Add mode=rwc to enable auto-creation
    let auto_create_url = if url.contains('?') {
        format!("{url}&mode=rwc")
    } else {
        format!("{url}?mode=rwc")
    };
    debug!("Modified SQLite URL to enable auto-creation: {url} -> {auto_create_url}");
    Ok(auto_create_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_database_type_from_url() {
        assert_eq!(
            DatabaseType::detect("sqlite::memory:").unwrap(),
            DatabaseType::SQLite
        );
        assert_eq!(
            DatabaseType::detect("sqlite://./data/app.db").unwrap(),
            DatabaseType::SQLite
        );
        assert_eq!(
            DatabaseType::detect("postgres://user@host/db").unwrap(),
            DatabaseType::PostgreSQL
        );
        assert_eq!(
            DatabaseType::detect("postgresql://user@host/db").unwrap(),
            DatabaseType::PostgreSQL
        );
        assert_eq!(
            DatabaseType::detect("mysql://user@host/db").unwrap(),
            DatabaseType::MySQL
        );
        assert!(DatabaseType::detect("mongodb://host/db").is_err());
    }

    #[test]
    fn sqlite_memory_url_passes_through_unchanged() {
        assert_eq!(
            ensure_sqlite_auto_creation("sqlite::memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            ensure_sqlite_auto_creation("sqlite://./x.db?mode=ro").unwrap(),
            "sqlite://./x.db?mode=ro"
        );
    }

    #[test]
    fn missing_sqlite_file_gets_auto_create_mode() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("app.db");
        let url = format!("sqlite://{}", db_path.display());

        let rewritten = ensure_sqlite_auto_creation(&url).unwrap();
        assert!(rewritten.ends_with("?mode=rwc"));
        // Parent directory is created eagerly so the driver can open the file.
        assert!(db_path.parent().unwrap().exists());
    }

    #[tokio::test]
    async fn from_connections_rejects_missing_default_pool() {
        let connection = Database::connect("sqlite::memory:").await.unwrap();
        let mut pools = HashMap::new();
        pools.insert(DataSourceKey::SLAVE, Arc::new(connection));

        let result = DataSourceRegistry::from_connections(pools, DataSourceKey::MASTER);
        assert!(matches!(
            result,
            Err(RegistryError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn resolve_unknown_key_fails_fast() {
        let connection = Database::connect("sqlite::memory:").await.unwrap();
        let mut pools = HashMap::new();
        pools.insert(DataSourceKey::MASTER, Arc::new(connection));
        let registry =
            DataSourceRegistry::from_connections(pools, DataSourceKey::MASTER).unwrap();

        let err = registry.resolve(&DataSourceKey::new("fourth")).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownKey { ref key } if key.as_str() == "fourth"));
    }
}
