//! Centralized error handling for the routing layer
//!
//! # Error Categories
//!
//! - **Context Errors**: key stack contract violations (pop without push)
//! - **Registry Errors**: unknown keys, startup connection failures, bad
//!   configuration
//! - **Routing Errors**: top-level composition of the above plus database
//!   failures propagated unchanged from the underlying pool

pub mod types;

pub use types::*;

/// Convenience type alias for Results using RoutingError
pub type RoutingResult<T> = Result<T, RoutingError>;

/// Convenience type alias for Registry Results
pub type RegistryResult<T> = Result<T, RegistryError>;
