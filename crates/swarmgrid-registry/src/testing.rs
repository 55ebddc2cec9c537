//! Test doubles for the storage and cluster collaborators.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use swarmgrid_engine::{ClusterApi, EngineError, EngineInfo, EngineResult, JoinTokens, Peer, SwarmInfo};
use swarmgrid_state::{KvStore, MemoryStore, StateResult};

/// Scripted cluster: nodes report fixed manager lists, the first live
/// manager is the leader, and any host can be taken down.
#[derive(Default)]
pub struct FakeCluster {
    nodes: Mutex<HashMap<String, Vec<String>>>,
    down: Mutex<HashSet<String>>,
    unhealthy: Mutex<HashSet<String>>,
    delays: Mutex<HashMap<String, Duration>>,
    fail_tokens: AtomicBool,
    calls: AtomicUsize,
}

impl FakeCluster {
    pub fn add_node(&self, address: &str, managers: &[&str]) {
        self.nodes.lock().unwrap().insert(
            address.to_string(),
            managers.iter().map(|m| m.to_string()).collect(),
        );
    }

    pub fn take_down(&self, host: &str) {
        self.down.lock().unwrap().insert(host.to_string());
    }

    pub fn mark_unhealthy(&self, host: &str) {
        self.unhealthy.lock().unwrap().insert(host.to_string());
    }

    /// Make `node_info` on `address` take `delay` before answering.
    pub fn delay(&self, address: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(address.to_string(), delay);
    }

    pub fn fail_tokens(&self) {
        self.fail_tokens.store(true, Ordering::SeqCst);
    }

    /// Total remote calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self, host: &str) -> EngineResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down.lock().unwrap().contains(host) {
            return Err(EngineError::Connect {
                address: host.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn node_info(&self, address: &str) -> EngineResult<EngineInfo> {
        self.touch(address)?;
        let delay = self.delays.lock().unwrap().get(address).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let managers = self
            .nodes
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or_else(|| EngineError::Connect {
                address: address.to_string(),
                reason: "no route to host".to_string(),
            })?;
        Ok(EngineInfo {
            swarm: SwarmInfo {
                node_id: address.to_string(),
                remote_managers: Some(
                    managers
                        .iter()
                        .map(|m| Peer {
                            node_id: m.clone(),
                            addr: format!("{m}:2377"),
                        })
                        .collect(),
                ),
            },
        })
    }

    async fn leader(&self, managers: &[String]) -> EngineResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let down = self.down.lock().unwrap();
        managers
            .iter()
            .find(|m| !down.contains(*m))
            .cloned()
            .ok_or_else(|| EngineError::NoLeader(managers.to_vec()))
    }

    async fn health(&self, leader: &str) -> EngineResult<bool> {
        self.touch(leader)?;
        Ok(!self.unhealthy.lock().unwrap().contains(leader))
    }

    async fn manager(&self, leader: &str) -> EngineResult<String> {
        self.touch(leader)?;
        Ok(format!("{leader}:2377"))
    }

    async fn tokens(&self, leader: &str) -> EngineResult<JoinTokens> {
        self.touch(leader)?;
        if self.fail_tokens.load(Ordering::SeqCst) {
            return Err(EngineError::MissingToken("manager"));
        }
        Ok(JoinTokens {
            manager: format!("SWMTKN-1-{leader}-m"),
            worker: format!("SWMTKN-1-{leader}-w"),
        })
    }
}

/// Store that can be frozen: while frozen, writes report success but are
/// silently discarded.
#[derive(Default)]
pub struct FreezableStore {
    inner: MemoryStore,
    frozen: AtomicBool,
}

impl FreezableStore {
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::SeqCst);
    }
}

impl KvStore for FreezableStore {
    fn get(&self, key: &str) -> StateResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StateResult<()> {
        if self.frozen.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.inner.set(key, value)
    }
}
