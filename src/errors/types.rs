//! Error type definitions for the data source routing layer.

use thiserror::Error;

use crate::key::DataSourceKey;

/// Top-level routing error.
///
/// Everything that can fail between a bound call and the pool it routes to.
/// The routing layer never swallows an error: pool failures cross it
/// unchanged, and the interceptor restores the key stack before any of these
/// reach the caller.
#[derive(Error, Debug)]
pub enum RoutingError {
    /// Key stack contract violations
    #[error("context error: {0}")]
    Context(#[from] ContextError),

    /// Registry lookup and startup failures
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Database errors from the underlying pool (SeaORM)
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Key stack contract violations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContextError {
    /// Pop without a matching push; an interceptor bug, never a recoverable
    /// runtime condition.
    #[error("data source context stack is empty")]
    EmptyStack,
}

/// Registry-level errors.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The requested key has no registered pool. Not retried and never
    /// silently replaced with the default pool.
    #[error("unknown data source key: {key}")]
    UnknownKey { key: DataSourceKey },

    /// A configured pool could not be established at startup.
    #[error("data source '{key}' connection failed: {source}")]
    Connection {
        key: DataSourceKey,
        #[source]
        source: sea_orm::DbErr,
    },

    /// Invalid registry configuration.
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl RegistryError {
    /// Create a configuration error with a custom message
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
