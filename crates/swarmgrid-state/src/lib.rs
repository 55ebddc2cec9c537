//! swarmgrid-state — key-value storage for SwarmGrid.
//!
//! The registry persists exactly two opaque strings (the swarm list and the
//! active swarm) under fixed keys. This crate provides the [`KvStore`]
//! contract for that and two implementations:
//!
//! - [`RedbStore`], backed by [redb](https://docs.rs/redb), on disk or in memory.
//! - [`MemoryStore`], a plain map used as a test fake.
//!
//! # Consistency
//!
//! Only whole-value `get` and `set` are offered. There is no
//! compare-and-swap and no multi-key transaction, so a read-modify-write
//! by one caller can be overwritten by a concurrent caller (last write wins).

pub mod error;
pub mod memory;
pub mod store;
pub mod tables;

pub use error::{StateError, StateResult};
pub use memory::MemoryStore;
pub use store::{KvStore, RedbStore};
