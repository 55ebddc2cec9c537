//! redb table definitions for the SwarmGrid store.

use redb::TableDefinition;

/// Opaque string slots keyed by name (e.g. `swarmgrid:swarms`).
pub const SLOTS: TableDefinition<&str, &str> = TableDefinition::new("slots");
