//! swarmgrid-core — shared building blocks for SwarmGrid.
//!
//! Holds the `swarmgrid.toml` configuration model, the names reserved by
//! the query surface, and the address-syntax check used when registering
//! a swarm.

pub mod config;
pub mod validate;

pub use config::{ApiConfig, ConfigError, EngineConfig, StorageConfig, SwarmgridConfig};
pub use validate::{RESERVED_NAMES, is_reserved_name, is_valid_address};
