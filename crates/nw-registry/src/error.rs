//! Error types for the Node Registry.

use thiserror::Error;
use uuid::Uuid;

/// Node Registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No node registered under the given id.
    #[error("node not found: {node_id}")]
    NodeNotFound { node_id: Uuid },
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
