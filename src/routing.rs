//! Routing connection provider.
//!
//! The connection consumption point for collaborators: persistence code asks
//! [`RoutingProvider::acquire`] for a connection instead of addressing a pool
//! directly, and gets back the pool matching the caller's current data source
//! key.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::{debug, warn};

use crate::context::DataSourceContext;
use crate::errors::{RoutingError, RoutingResult};
use crate::key::DataSourceKey;
use crate::registry::DataSourceRegistry;

/// Dispatches each connection acquisition to the pool for the current key.
#[derive(Clone)]
pub struct RoutingProvider {
    registry: Arc<DataSourceRegistry>,
}

impl RoutingProvider {
    pub fn new(registry: Arc<DataSourceRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &DataSourceRegistry {
        &self.registry
    }

    /// Returns the pool handle for the caller's current data source key, or
    /// for the registry default when the context is unset.
    ///
    /// An explicitly set key that is missing from the registry fails fast
    /// with [`RoutingError::Registry`]; only an *absent* key falls back to
    /// the default. The handle stays bound to one pool for however long the
    /// caller holds it; switching keys mid-transaction yields independent,
    /// non-atomic acquisitions across pools.
    pub fn acquire(&self) -> RoutingResult<Arc<DatabaseConnection>> {
        match DataSourceContext::current() {
            Some(key) => {
                debug!("routing connection acquisition to '{}'", key);
                self.registry.resolve(&key).map_err(|e| {
                    warn!("current data source key '{}' has no registered pool", key);
                    RoutingError::from(e)
                })
            }
            None => {
                let key = self.registry.default_key();
                debug!("no data source key set; routing to default '{}'", key);
                Ok(self.registry.resolve(key)?)
            }
        }
    }

    /// Explicit keyed acquisition, bypassing the context.
    pub fn acquire_for(&self, key: &DataSourceKey) -> RoutingResult<Arc<DatabaseConnection>> {
        Ok(self.registry.resolve(key)?)
    }
}
