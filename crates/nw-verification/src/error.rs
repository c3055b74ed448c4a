//! Error types for the Verification Engine.
//!
//! Per-adjudication problems (wrong answer, slow answer, unknown challenge)
//! are not errors: they become [`shared_types::VerificationResult`] values
//! with a failure reason. Only conditions that prevent the engine from
//! adjudicating at all surface here.

use thiserror::Error;
use uuid::Uuid;

/// Verification Engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The trusted reference node could not produce ground truth. The
    /// server cannot adjudicate what it cannot answer itself.
    #[error("oracle unavailable: {reason}")]
    OracleUnavailable { reason: String },

    /// The node may not be issued challenges (banned or deactivated).
    #[error("node {node_id} excluded from verification: {reason}")]
    NodeExcluded { node_id: Uuid, reason: String },
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// A failed RPC gateway call, carrying however long the call took to fail.
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct GatewayError {
    pub reason: String,
    pub latency_ms: u64,
}

impl GatewayError {
    pub fn new(reason: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            reason: reason.into(),
            latency_ms,
        }
    }
}
