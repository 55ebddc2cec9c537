//! Registry error taxonomy and its stable numeric codes.
//!
//! Codes are negative, grouped by the CRUD operation that produced them
//! (GET -101x, POST -102x, DELETE -103x, PUT -104x) and shared for
//! storage faults (-105x). Callers branch on them, so they never change.

use thiserror::Error;

use swarmgrid_engine::EngineError;
use swarmgrid_state::StateError;

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("swarm {0} already exists")]
    DuplicateMember(String),

    #[error("no such swarm: {0}")]
    NotFound(String),

    #[error("{0} is reserved for the system key words")]
    ReservedName(String),

    #[error("swarm {0} is active and cannot be deleted")]
    ActiveClusterProtected(String),

    #[error("node unreachable: {0}")]
    UnreachableNode(#[from] EngineError),

    #[error("stored {key} could not be decoded: {reason}")]
    StorageDecode { key: String, reason: String },

    #[error("storage error: {0}")]
    Storage(#[from] StateError),

    #[error("store did not reflect the update: {0}")]
    PersistenceInconsistency(String),
}

/// Discriminant of [`RegistryError`], for matching without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    DuplicateMember,
    NotFound,
    ReservedName,
    ActiveClusterProtected,
    UnreachableNode,
    StorageDecode,
    Storage,
    PersistenceInconsistency,
}

/// The CRUD entry point a failure is reported through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    Post,
    Delete,
    Put,
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::DuplicateMember(_) => ErrorKind::DuplicateMember,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::ReservedName(_) => ErrorKind::ReservedName,
            Self::ActiveClusterProtected(_) => ErrorKind::ActiveClusterProtected,
            Self::UnreachableNode(_) => ErrorKind::UnreachableNode,
            Self::StorageDecode { .. } => ErrorKind::StorageDecode,
            Self::Storage(_) => ErrorKind::Storage,
            Self::PersistenceInconsistency(_) => ErrorKind::PersistenceInconsistency,
        }
    }

    /// Stable code for this error as reported by `op`.
    pub fn code(&self, op: Operation) -> i32 {
        use ErrorKind::*;

        match (op, self.kind()) {
            (_, StorageDecode) => -1050,
            (_, Storage) => -1051,
            (_, PersistenceInconsistency) => -1052,

            (Operation::Get, InvalidInput) => -1010,
            (Operation::Get, NotFound) => -1011,
            (Operation::Get, UnreachableNode) => -1012,
            (Operation::Get, _) => -1019,

            (Operation::Post, InvalidInput) => -1020,
            (Operation::Post, DuplicateMember) => -1021,
            (Operation::Post, UnreachableNode) => -1022,
            (Operation::Post, ReservedName) => -1023,
            (Operation::Post, _) => -1029,

            (Operation::Delete, NotFound) => -1030,
            (Operation::Delete, ReservedName) => -1031,
            (Operation::Delete, ActiveClusterProtected) => -1032,
            (Operation::Delete, InvalidInput) => -1033,
            (Operation::Delete, _) => -1039,

            (Operation::Put, NotFound) => -1040,
            (Operation::Put, InvalidInput) => -1041,
            (Operation::Put, _) => -1049,
        }
    }
}
