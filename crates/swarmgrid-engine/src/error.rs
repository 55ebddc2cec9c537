//! Errors from the engine client.

use thiserror::Error;

/// Result type alias for engine calls.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("connect to {address} failed: {reason}")]
    Connect { address: String, reason: String },

    #[error("tls error: {0}")]
    Tls(String),

    #[error("request to {uri} failed: {reason}")]
    Request { uri: String, reason: String },

    #[error("{uri} returned {status}")]
    Status { uri: String, status: u16 },

    #[error("{uri} timed out after {timeout_ms}ms")]
    Timeout { uri: String, timeout_ms: u128 },

    #[error("malformed response from {uri}: {reason}")]
    Decode { uri: String, reason: String },

    #[error("no reachable leader among managers {0:?}")]
    NoLeader(Vec<String>),

    #[error("join token missing: {0}")]
    MissingToken(&'static str),
}
