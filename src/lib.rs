//! Dynamic data source routing
//!
//! This crate lets application code read from or write to one of several
//! logical database connections ("master", "slave", "third", ...) selected
//! per call, without threading a connection through every signature:
//! - a task-scoped stack of active data source keys ([`context`])
//! - a declarative binding applied around each call ([`binding`])
//! - a registry of one SeaORM pool per configured key ([`registry`])
//! - a provider that routes each acquisition to the pool matching the
//!   caller's current key ([`routing`])

pub mod binding;
pub mod config;
pub mod context;
pub mod errors;
pub mod key;
pub mod registry;
pub mod routing;
