/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Data source defaults
pub const DEFAULT_DATA_SOURCE: &str = "master";
pub const DEFAULT_DATA_SOURCE_URL: &str = "sqlite://./data/master.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

// Pool timing defaults (seconds); fast-fail values for offline databases
// and pool exhaustion, generous recycling for healthy pools
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;
