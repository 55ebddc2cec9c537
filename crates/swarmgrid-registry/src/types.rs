//! Registry domain types.
//!
//! [`SwarmRecord`] is what gets persisted. [`SwarmView`] is what listing
//! returns: the record plus live annotations that are never written back.

use serde::{Deserialize, Serialize};

/// One registered swarm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SwarmRecord {
    /// Unique within the registry.
    pub name: String,
    /// Manager hosts discovered at registration, in engine order.
    pub manager_addresses: Vec<String>,
    /// Fetched once at registration and never changed.
    pub manager_token: String,
    /// Fetched once at registration and never changed.
    pub worker_token: String,
}

/// Result of a live health check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SwarmState {
    Healthy,
    Unhealthy,
}

/// A record annotated for listing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SwarmView {
    #[serde(flatten)]
    pub record: SwarmRecord,
    /// `None` when the health check was not requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<SwarmState>,
    /// Leader's manager endpoint; `None` when the lookup failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
}
