//! SwarmRegistry — membership and active-cluster selection.
//!
//! Every public method starts from a fresh load of both documents; nothing
//! is cached between calls. Mutations rewrite the whole document and, for
//! `remove` and `set_active`, re-load afterwards to confirm the store took
//! the write.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use swarmgrid_core::{StorageConfig, is_reserved_name, is_valid_address};
use swarmgrid_engine::{ClusterApi, EngineError};
use swarmgrid_state::KvStore;

use crate::codec;
use crate::error::{RegistryError, RegistryResult};
use crate::types::{SwarmRecord, SwarmState, SwarmView};

pub struct SwarmRegistry {
    store: Arc<dyn KvStore>,
    cluster: Arc<dyn ClusterApi>,
    swarm_key: String,
    active_key: String,
    /// Serializes this process's read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl SwarmRegistry {
    /// Create a registry using the default storage keys.
    pub fn new(store: Arc<dyn KvStore>, cluster: Arc<dyn ClusterApi>) -> Self {
        let defaults = StorageConfig::default();
        Self {
            store,
            cluster,
            swarm_key: defaults.swarm_key,
            active_key: defaults.active_key,
            write_lock: Mutex::new(()),
        }
    }

    /// Override the keys the two documents are stored under.
    pub fn with_keys(mut self, swarm_key: impl Into<String>, active_key: impl Into<String>) -> Self {
        self.swarm_key = swarm_key.into();
        self.active_key = active_key.into();
        self
    }

    pub fn swarm_key(&self) -> &str {
        &self.swarm_key
    }

    pub fn active_key(&self) -> &str {
        &self.active_key
    }

    // ── Storage ────────────────────────────────────────────────────

    fn load_swarms(&self) -> RegistryResult<Vec<SwarmRecord>> {
        let raw = self.store.get(&self.swarm_key)?;
        let swarms = codec::decode_swarms(&self.swarm_key, raw.as_deref())?;
        debug!(count = swarms.len(), "swarm list loaded");
        Ok(swarms)
    }

    fn store_swarms(&self, swarms: &[SwarmRecord]) -> RegistryResult<()> {
        let raw = codec::encode_swarms(swarms)?;
        self.store.set(&self.swarm_key, &raw)?;
        debug!(count = swarms.len(), "swarm list stored");
        Ok(())
    }

    fn load_active(&self) -> RegistryResult<Option<SwarmRecord>> {
        let raw = self.store.get(&self.active_key)?;
        codec::decode_active(&self.active_key, raw.as_deref())
    }

    fn store_active(&self, active: &SwarmRecord) -> RegistryResult<()> {
        let raw = codec::encode_active(active)?;
        self.store.set(&self.active_key, &raw)?;
        debug!(name = %active.name, "active swarm stored");
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────────

    /// All records in registration order, annotated with live lookups.
    ///
    /// The manager endpoint is always looked up and silently omitted on
    /// failure. With `check_health`, each record also gets a state; any
    /// failure along the way reads as unhealthy. Records are annotated
    /// concurrently and independently.
    pub async fn list(&self, check_health: bool) -> RegistryResult<Vec<SwarmView>> {
        let swarms = self.load_swarms()?;
        let views = join_all(
            swarms
                .into_iter()
                .map(|record| self.annotate(record, check_health)),
        )
        .await;
        Ok(views)
    }

    async fn annotate(&self, record: SwarmRecord, check_health: bool) -> SwarmView {
        let leader = self.cluster.leader(&record.manager_addresses).await;

        let state = if check_health {
            let healthy = match &leader {
                Ok(leader) => matches!(self.cluster.health(leader).await, Ok(true)),
                Err(_) => false,
            };
            Some(if healthy {
                SwarmState::Healthy
            } else {
                SwarmState::Unhealthy
            })
        } else {
            None
        };

        let manager = match &leader {
            Ok(leader) => self.cluster.manager(leader).await.ok(),
            Err(e) => {
                debug!(name = %record.name, error = %e, "leader lookup failed");
                None
            }
        };

        SwarmView {
            record,
            state,
            manager,
        }
    }

    /// The record named exactly `name`.
    pub fn get(&self, name: &str) -> RegistryResult<Option<SwarmRecord>> {
        Ok(self.load_swarms()?.into_iter().find(|s| s.name == name))
    }

    pub fn is_member(&self, name: &str) -> RegistryResult<bool> {
        let member = self.load_swarms()?.iter().any(|s| s.name == name);
        debug!(%name, member, "membership checked");
        Ok(member)
    }

    /// Snapshot of the active swarm, if one is set.
    pub fn active(&self) -> RegistryResult<Option<SwarmRecord>> {
        self.load_active()
    }

    pub fn is_active(&self, name: &str) -> RegistryResult<bool> {
        Ok(self.load_active()?.is_some_and(|active| active.name == name))
    }

    /// Host of the active swarm's current leader.
    pub async fn leader(&self) -> RegistryResult<String> {
        let active = self
            .load_active()?
            .ok_or_else(|| RegistryError::NotFound("no active swarm".to_string()))?;
        Ok(self.cluster.leader(&active.manager_addresses).await?)
    }

    // ── Mutations ──────────────────────────────────────────────────

    /// Register the swarm that the node at `address` belongs to.
    ///
    /// Discovers the managers through the node, resolves the leader, and
    /// fetches both join tokens. Any remote failure aborts before anything
    /// is written. Remote calls run without the write lock; membership is
    /// checked again under the lock before the list is stored.
    pub async fn add(&self, name: &str, address: &str) -> RegistryResult<SwarmRecord> {
        if name.is_empty() || address.is_empty() || !is_valid_address(address) {
            return Err(RegistryError::InvalidInput(format!(
                "name and a valid IP address are required (name={name:?}, address={address:?})"
            )));
        }
        if is_reserved_name(name) {
            return Err(RegistryError::ReservedName(name.to_string()));
        }
        if self.is_member(name)? {
            return Err(RegistryError::DuplicateMember(name.to_string()));
        }

        let info = self.cluster.node_info(address).await.inspect_err(|e| {
            warn!(%name, %address, error = %e, "node info lookup failed");
        })?;
        let managers = info.manager_hosts();
        if managers.is_empty() {
            warn!(%name, %address, "node reports no swarm managers");
            return Err(EngineError::NoLeader(managers).into());
        }

        let leader = self.cluster.leader(&managers).await?;
        let tokens = self.cluster.tokens(&leader).await.inspect_err(|e| {
            warn!(%name, %leader, error = %e, "join token lookup failed");
        })?;

        let record = SwarmRecord {
            name: name.to_string(),
            manager_addresses: managers,
            manager_token: tokens.manager,
            worker_token: tokens.worker,
        };

        let _guard = self.write_lock.lock().await;
        let mut swarms = self.load_swarms()?;
        if swarms.iter().any(|s| s.name == name) {
            return Err(RegistryError::DuplicateMember(name.to_string()));
        }
        swarms.push(record.clone());
        self.store_swarms(&swarms)?;

        info!(%name, %address, %leader, managers = record.manager_addresses.len(), "swarm added");
        Ok(record)
    }

    /// Unregister `name`. The active swarm cannot be removed.
    pub async fn remove(&self, name: &str) -> RegistryResult<()> {
        if is_reserved_name(name) {
            return Err(RegistryError::ReservedName(name.to_string()));
        }

        let _guard = self.write_lock.lock().await;
        if self.is_active(name)? {
            return Err(RegistryError::ActiveClusterProtected(name.to_string()));
        }

        let mut swarms = self.load_swarms()?;
        let index = swarms
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        swarms.remove(index);
        self.store_swarms(&swarms)?;

        if self.is_member(name)? {
            warn!(%name, "swarm still present after delete");
            return Err(RegistryError::PersistenceInconsistency(format!(
                "{name} still registered after delete"
            )));
        }

        info!(%name, "swarm removed");
        Ok(())
    }

    /// Activate a registered swarm; `NotFound` if `name` is not a member.
    pub async fn activate(&self, name: &str) -> RegistryResult<()> {
        let _guard = self.write_lock.lock().await;
        if !self.is_member(name)? {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        self.transition_active(name)
    }

    /// Make `name` the active swarm. A no-op if it already is.
    ///
    /// Callers are expected to have checked membership; see [`Self::activate`].
    pub async fn set_active(&self, name: &str) -> RegistryResult<()> {
        let _guard = self.write_lock.lock().await;
        self.transition_active(name)
    }

    fn transition_active(&self, name: &str) -> RegistryResult<()> {
        if self.is_active(name)? {
            debug!(%name, "swarm already active");
            return Ok(());
        }

        let record = self
            .get(name)?
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        self.store_active(&record)?;

        if !self.is_active(name)? {
            warn!(%name, "active pointer did not take the update");
            return Err(RegistryError::PersistenceInconsistency(format!(
                "{name} not active after update"
            )));
        }

        info!(%name, "active swarm changed");
        Ok(())
    }
}
