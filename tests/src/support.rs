//! Shared mocks and fixtures for integration flows.

use async_trait::async_trait;
use uuid::Uuid;

use nw_verification::{GatewayError, GatewayFactory, RpcGateway, Timed};
use shared_types::{ChallengeKind, NodeRecord, NodeTier, TrustState, VerificationMethod};

/// Gateway answering every query with a fixed string and latency.
pub struct ScriptedGateway {
    pub answer: String,
    pub latency_ms: u64,
    pub fail: bool,
}

impl ScriptedGateway {
    pub fn answering(answer: &str, latency_ms: u64) -> Self {
        Self {
            answer: answer.to_string(),
            latency_ms,
            fail: false,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            answer: String::new(),
            latency_ms: 5000,
            fail: true,
        }
    }
}

#[async_trait]
impl RpcGateway for ScriptedGateway {
    async fn execute(&self, _kind: &ChallengeKind) -> Result<Timed<String>, GatewayError> {
        if self.fail {
            return Err(GatewayError::new("connection refused", self.latency_ms));
        }
        Ok(Timed::new(self.answer.clone(), self.latency_ms))
    }

    async fn block_number(&self) -> Result<Timed<u64>, GatewayError> {
        if self.fail {
            return Err(GatewayError::new("connection refused", self.latency_ms));
        }
        Ok(Timed::new(45_000_000, self.latency_ms))
    }

    async fn sync_status(&self) -> Result<Timed<bool>, GatewayError> {
        Ok(Timed::new(true, self.latency_ms))
    }

    async fn peer_count(&self) -> Result<Timed<u64>, GatewayError> {
        Ok(Timed::new(16, self.latency_ms))
    }
}

/// Factory handing out identically scripted gateways for any endpoint.
pub struct ScriptedConnector {
    pub answer: String,
    pub latency_ms: u64,
}

impl ScriptedConnector {
    pub fn answering(answer: &str, latency_ms: u64) -> Self {
        Self {
            answer: answer.to_string(),
            latency_ms,
        }
    }
}

impl GatewayFactory for ScriptedConnector {
    type Gateway = ScriptedGateway;

    fn connect(&self, _endpoint: &str, _auth_token: Option<&str>) -> ScriptedGateway {
        ScriptedGateway::answering(&self.answer, self.latency_ms)
    }
}

/// A registered-looking node record without going through the registry.
pub fn node_fixture(tier: NodeTier, method: VerificationMethod) -> NodeRecord {
    NodeRecord {
        id: Uuid::new_v4(),
        wallet_address: "0x1111111111111111111111111111111111111111".to_string(),
        tier,
        verification_method: method,
        rpc_endpoint: Some("http://127.0.0.1:8545".to_string()),
        auth_token: None,
        registered_at: chrono::Utc::now().timestamp_millis(),
        last_verified_at: None,
        last_heartbeat_at: None,
        total_challenges_passed: 0,
        total_challenges_failed: 0,
        total_uptime_minutes: 0,
        total_points: 0,
        is_active: true,
        trust: TrustState::default(),
    }
}
