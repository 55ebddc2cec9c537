//! The cluster control API contract and its Docker Engine implementation.

use async_trait::async_trait;
use tracing::{debug, warn};

use swarmgrid_core::EngineConfig;

use crate::error::{EngineError, EngineResult};
use crate::tls;
use crate::transport::Transport;
use crate::types::{EngineInfo, JoinTokens, Node, SwarmInspect, host_of, leader_status};

/// Remote control-plane queries the registry depends on.
///
/// Every call is independent and bounded by a short timeout.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Node info of `address`, including the swarm's remote managers.
    async fn node_info(&self, address: &str) -> EngineResult<EngineInfo>;

    /// Host of the current leader, asking `managers` in order until one answers.
    async fn leader(&self, managers: &[String]) -> EngineResult<String>;

    /// Whether the leader's engine reports itself healthy.
    async fn health(&self, leader: &str) -> EngineResult<bool>;

    /// The leader's swarm manager endpoint (`host:port`).
    async fn manager(&self, leader: &str) -> EngineResult<String>;

    /// Manager and worker join tokens, read from the leader.
    async fn tokens(&self, leader: &str) -> EngineResult<JoinTokens>;
}

/// HTTP client for the Docker Engine API on swarm nodes.
#[derive(Clone)]
pub struct EngineClient {
    transport: Transport,
}

impl EngineClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Build a client from the `[engine]` config section.
    pub fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        let mut transport = Transport::new(config.port, config.timeout())
            .with_user_agent(config.user_agent.clone());
        if config.tls {
            warn!(port = config.port, "engine TLS enabled without certificate verification");
            transport = transport.with_tls(tls::trust_all()?);
        }
        Ok(Self::new(transport))
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    async fn nodes(&self, host: &str) -> EngineResult<Vec<Node>> {
        self.transport.get_json(host, "/nodes").await
    }
}

#[async_trait]
impl ClusterApi for EngineClient {
    async fn node_info(&self, address: &str) -> EngineResult<EngineInfo> {
        let info: EngineInfo = self.transport.get_json(address, "/info").await?;
        debug!(%address, managers = ?info.manager_hosts(), "node info fetched");
        Ok(info)
    }

    async fn leader(&self, managers: &[String]) -> EngineResult<String> {
        for manager in managers {
            match self.nodes(manager).await {
                Ok(nodes) => {
                    // The first manager that answers is authoritative.
                    return match leader_status(&nodes) {
                        Some(status) => {
                            let leader = host_of(&status.addr).to_string();
                            debug!(%manager, %leader, "leader resolved");
                            Ok(leader)
                        }
                        None => Err(EngineError::NoLeader(managers.to_vec())),
                    };
                }
                Err(e) => {
                    debug!(%manager, error = %e, "manager unreachable, trying next");
                }
            }
        }
        Err(EngineError::NoLeader(managers.to_vec()))
    }

    async fn health(&self, leader: &str) -> EngineResult<bool> {
        let body = self.transport.get(leader, "/_ping").await?;
        Ok(body.as_ref() == b"OK")
    }

    async fn manager(&self, leader: &str) -> EngineResult<String> {
        let nodes = self.nodes(leader).await?;
        leader_status(&nodes)
            .map(|status| status.addr.clone())
            .ok_or_else(|| EngineError::NoLeader(vec![leader.to_string()]))
    }

    async fn tokens(&self, leader: &str) -> EngineResult<JoinTokens> {
        let swarm: SwarmInspect = self.transport.get_json(leader, "/swarm").await?;
        let tokens = swarm.join_tokens;
        if tokens.manager.is_empty() {
            return Err(EngineError::MissingToken("manager"));
        }
        if tokens.worker.is_empty() {
            return Err(EngineError::MissingToken("worker"));
        }
        Ok(tokens)
    }
}
