//! swarmgrid-engine — remote cluster control API for SwarmGrid.
//!
//! Talks to the Docker Engine API exposed by swarm nodes to discover
//! managers, find the current leader, check its health, and fetch join
//! tokens.
//!
//! # Architecture
//!
//! ```text
//! ClusterApi (trait, consumed by the registry)
//!   └── EngineClient
//!         ├── transport::get()  → one HTTP/1 GET per call, bounded by a timeout
//!         └── tls::trust_all()  → optional rustls connector, no cert checks
//! ```
//!
//! # Security
//!
//! With TLS enabled, server certificates are **not verified**. Internal
//! control planes commonly run self-signed certificates and the registry
//! trusts them all. Anyone able to intercept traffic to a manager can
//! impersonate it.

pub mod client;
pub mod error;
pub mod tls;
pub mod transport;
pub mod types;

pub use client::{ClusterApi, EngineClient};
pub use error::{EngineError, EngineResult};
pub use types::*;
