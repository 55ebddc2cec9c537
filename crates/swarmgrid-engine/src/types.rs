//! Docker Engine API response shapes.
//!
//! Only the fields SwarmGrid reads are modelled; everything else in the
//! engine's documents is ignored on decode.

use serde::{Deserialize, Serialize};

/// `GET /info`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineInfo {
    #[serde(rename = "Swarm", default)]
    pub swarm: SwarmInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SwarmInfo {
    #[serde(rename = "NodeID", default)]
    pub node_id: String,
    /// `null` when the node is not part of a swarm.
    #[serde(rename = "RemoteManagers", default)]
    pub remote_managers: Option<Vec<Peer>>,
}

/// A manager as seen from another node.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Peer {
    #[serde(rename = "NodeID", default)]
    pub node_id: String,
    /// `host:port` of the manager's swarm endpoint.
    #[serde(rename = "Addr")]
    pub addr: String,
}

impl EngineInfo {
    /// Manager hosts with the port stripped, in the order the engine
    /// reported them. Duplicates are dropped.
    pub fn manager_hosts(&self) -> Vec<String> {
        let mut hosts: Vec<String> = Vec::new();
        for peer in self.swarm.remote_managers.iter().flatten() {
            let host = host_of(&peer.addr).to_string();
            if !host.is_empty() && !hosts.contains(&host) {
                hosts.push(host);
            }
        }
        hosts
    }
}

/// One entry of `GET /nodes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Node {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "ManagerStatus", default)]
    pub manager_status: Option<ManagerStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ManagerStatus {
    #[serde(rename = "Leader", default)]
    pub leader: bool,
    #[serde(rename = "Reachability", default)]
    pub reachability: String,
    #[serde(rename = "Addr", default)]
    pub addr: String,
}

/// `GET /swarm`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SwarmInspect {
    #[serde(rename = "JoinTokens", default)]
    pub join_tokens: JoinTokens,
}

/// Credentials a new node presents to join as manager or worker.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinTokens {
    #[serde(rename = "Manager", default)]
    pub manager: String,
    #[serde(rename = "Worker", default)]
    pub worker: String,
}

/// The leader's manager status within a `/nodes` listing.
pub fn leader_status(nodes: &[Node]) -> Option<&ManagerStatus> {
    nodes
        .iter()
        .filter_map(|node| node.manager_status.as_ref())
        .find(|status| status.leader)
}

/// Strip the port from `host:port`, including bracketed IPv6 (`[::1]:2377`).
/// A bare host is returned unchanged.
pub fn host_of(addr: &str) -> &str {
    if let Some(rest) = addr.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match addr.rsplit_once(':') {
        // More than one colon without brackets is a bare IPv6 address.
        Some((host, _)) if !host.contains(':') => host,
        Some(_) => addr,
        None => addr,
    }
}
