//! swarmgrid.toml configuration parser.
//!
//! Every field has a default, so an empty (or missing) file yields a
//! working single-node setup: a redb file under `/var/lib/swarmgrid`,
//! the Docker Engine API on port 2375 with a 3 second timeout, and the
//! REST surface on `0.0.0.0:8080`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default Docker Engine API port on managed nodes.
pub const DEFAULT_ENGINE_PORT: u16 = 2375;

/// Default bound on every remote control-plane call, in seconds.
pub const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 3;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwarmgridConfig {
    pub storage: StorageConfig,
    pub engine: EngineConfig,
    pub api: ApiConfig,
}

/// Where the swarm list and the active pointer live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// redb database file.
    pub path: PathBuf,
    /// Key holding the serialized swarm list.
    pub swarm_key: String,
    /// Key holding the serialized active swarm.
    pub active_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/var/lib/swarmgrid/swarmgrid.redb"),
            swarm_key: "swarmgrid:swarms".to_string(),
            active_key: "swarmgrid:active".to_string(),
        }
    }
}

/// How managed nodes' control API is reached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub port: u16,
    pub timeout_secs: u64,
    /// Speak TLS to the engine. Certificates are never verified.
    pub tls: bool,
    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_ENGINE_PORT,
            timeout_secs: DEFAULT_ENGINE_TIMEOUT_SECS,
            tls: false,
            user_agent: "swarmgrid/0.1".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub listen: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl SwarmgridConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` if given and present, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) if p.exists() => Self::from_file(p),
            Some(p) => {
                debug!(path = ?p, "config file missing, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
