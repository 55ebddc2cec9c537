//! swarmgrid-registry — the swarm registry and active-cluster protocol.
//!
//! Tracks a flat list of registered swarms plus a pointer to the one
//! currently selected as active. Both are persisted as whole JSON
//! documents under two fixed keys of a [`swarmgrid_state::KvStore`].
//!
//! # Protocol
//!
//! ```text
//! every public operation:
//!   load swarm list + active pointer (fresh, never cached)
//!   → decide in memory (preconditions, first failure wins)
//!   → optionally write the full document back
//!   → for remove / activate: re-load and verify the write landed
//! ```
//!
//! # Consistency
//!
//! The store has no compare-and-swap, so load-decide-write is not atomic.
//! Mutations made through one [`SwarmRegistry`] are serialized by an
//! in-process lock; writers in other processes sharing the same store can
//! still lose updates (last write wins).

pub mod codec;
pub mod crud;
pub mod envelope;
pub mod error;
pub mod registry;
pub mod types;

#[cfg(test)]
mod testing;

pub use envelope::{Envelope, Payload, SwarmData};
pub use error::{ErrorKind, Operation, RegistryError, RegistryResult};
pub use registry::SwarmRegistry;
pub use types::{SwarmRecord, SwarmState, SwarmView};
