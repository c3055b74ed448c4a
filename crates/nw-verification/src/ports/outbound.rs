//! Driven ports: the blockchain RPC gateway the engine queries.

use async_trait::async_trait;
use shared_types::ChallengeKind;

use crate::error::GatewayError;

/// A gateway result together with the call's wall-clock latency.
#[derive(Debug, Clone)]
pub struct Timed<T> {
    pub value: T,
    pub latency_ms: u64,
}

impl<T> Timed<T> {
    pub fn new(value: T, latency_ms: u64) -> Self {
        Self { value, latency_ms }
    }
}

/// Executes typed queries against one blockchain node endpoint.
///
/// Two instances are used concurrently per adjudication: one pointed at the
/// operator-trusted reference node, one at the node under test. Every call
/// is a blocking network round-trip bounded by the transport's own timeout,
/// so a stalled node surfaces as a [`GatewayError`], never a hung engine.
#[async_trait]
pub trait RpcGateway: Send + Sync {
    /// Execute a challenge query and return the normalized answer string.
    async fn execute(&self, kind: &ChallengeKind) -> Result<Timed<String>, GatewayError>;

    /// Current chain head height.
    async fn block_number(&self) -> Result<Timed<u64>, GatewayError>;

    /// Whether the node reports itself fully synced.
    async fn sync_status(&self) -> Result<Timed<bool>, GatewayError>;

    /// Number of connected peers.
    async fn peer_count(&self) -> Result<Timed<u64>, GatewayError>;
}

/// Builds a gateway for a candidate node's own endpoint.
///
/// Candidate endpoints arrive with node registrations, so gateways for them
/// are constructed per verification rather than held for the engine's
/// lifetime.
pub trait GatewayFactory: Send + Sync {
    type Gateway: RpcGateway;

    fn connect(&self, endpoint: &str, auth_token: Option<&str>) -> Self::Gateway;
}
