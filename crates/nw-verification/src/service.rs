//! Verification Engine - core adjudication logic.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use shared_types::{
    Challenge, ChallengeResponse, CheatStatus, HeartbeatRecord, NodeRecord, VerificationResult,
    LATENCY_LOCAL_NODE_MS, LATENCY_MAX_ALLOWED_MS, LATENCY_PUBLIC_RPC_MS,
    LATENCY_SUSPICIOUS_MIN_MS,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use nw_challenge::ChallengeGenerator;

use crate::domain::answers_match;
use crate::error::{EngineError, EngineResult};
use crate::ports::{GatewayFactory, RpcGateway};

/// Failure reasons surfaced to callers. Unknown and already-resolved
/// challenge ids share one reason so an attacker cannot probe which ids
/// were ever issued.
pub const REASON_NOT_FOUND: &str = "challenge not found or expired";
pub const REASON_EXPIRED: &str = "challenge expired";
pub const REASON_INCORRECT: &str = "incorrect answer";
pub const REASON_TOO_SLOW: &str = "response too slow";
pub const REASON_NO_ENDPOINT: &str = "no RPC endpoint configured";

/// Latency thresholds applied during adjudication, in milliseconds.
#[derive(Clone, Debug)]
pub struct LatencyPolicy {
    /// Above this a passing answer is flagged suspicious (network jitter
    /// alone can cross it, so it is a soft signal, not a failure).
    pub suspicious_floor_ms: u64,
    /// At or above this the answer fails outright.
    pub hard_ceiling_ms: u64,
}

impl Default for LatencyPolicy {
    fn default() -> Self {
        Self {
            suspicious_floor_ms: LATENCY_SUSPICIOUS_MIN_MS,
            hard_ceiling_ms: LATENCY_MAX_ALLOWED_MS,
        }
    }
}

/// A challenge awaiting its answer, paired with the ground truth obtained
/// from the reference node at creation time. Never leaves this module.
struct PendingChallenge {
    challenge: Challenge,
    expected_answer: String,
}

/// Orchestrates challenge generation, oracle queries, and adjudication.
///
/// `G` is the gateway to the operator-trusted reference node; `F` builds
/// gateways for candidate nodes' own endpoints. The pending-challenge map is
/// the engine's only shared mutable state; network calls never happen under
/// its lock.
///
/// Latency on the prover path is adjudicated from the self-reported
/// `response_time_ms`, while the exposed-RPC path measures it server-side.
/// A prover can therefore underreport to dodge the suspicious flag; the
/// asymmetry is inherited from the protocol and flagged for design review
/// rather than papered over here.
pub struct VerificationEngine<G, F>
where
    G: RpcGateway,
    F: GatewayFactory,
{
    reference: Arc<G>,
    connector: F,
    generator: ChallengeGenerator,
    policy: LatencyPolicy,
    pending: RwLock<HashMap<Uuid, PendingChallenge>>,
}

impl<G, F> VerificationEngine<G, F>
where
    G: RpcGateway,
    F: GatewayFactory,
{
    /// Create an engine with the default latency policy.
    pub fn new(reference: Arc<G>, connector: F) -> Self {
        Self::with_policy(reference, connector, LatencyPolicy::default())
    }

    pub fn with_policy(reference: Arc<G>, connector: F, policy: LatencyPolicy) -> Self {
        Self {
            reference,
            connector,
            generator: ChallengeGenerator::new(),
            policy,
            pending: RwLock::new(HashMap::new()),
        }
    }

    /// Issue a challenge for a node, querying the reference node first so
    /// the expected answer is known before the challenge goes out.
    ///
    /// Only the public challenge is returned; the expected answer stays in
    /// the pending map until adjudication or expiry.
    pub async fn create_challenge(&self, node: &NodeRecord) -> EngineResult<Challenge> {
        self.ensure_eligible(node)?;

        let challenge = self.generator.generate(node.id, node.tier);

        let expected = self
            .reference
            .execute(&challenge.kind)
            .await
            .map_err(|e| EngineError::OracleUnavailable { reason: e.reason })?;

        debug!(
            challenge_id = %challenge.id,
            node_id = %node.id,
            kind = challenge.kind.name(),
            "challenge created"
        );

        self.pending.write().insert(
            challenge.id,
            PendingChallenge {
                challenge: challenge.clone(),
                expected_answer: expected.value,
            },
        );

        Ok(challenge)
    }

    /// Adjudicate a prover-submitted answer.
    ///
    /// The pending record is removed exactly once under the write lock, so
    /// of two submissions racing on the same id, one adjudicates and the
    /// rest observe "not found or expired". Every path yields a result;
    /// nothing here is an error.
    pub fn verify_response(&self, response: &ChallengeResponse) -> VerificationResult {
        let now = Utc::now().timestamp_millis();

        let pending = self.pending.write().remove(&response.challenge_id);

        let Some(pending) = pending else {
            return self.failed(response, REASON_NOT_FOUND, now);
        };

        if pending.challenge.is_expired(now) {
            return self.failed(response, REASON_EXPIRED, now);
        }

        if !answers_match(
            &response.answer,
            &pending.expected_answer,
            &pending.challenge.kind,
        ) {
            return self.failed(response, REASON_INCORRECT, now);
        }

        if response.response_time_ms >= self.policy.hard_ceiling_ms {
            return self.failed(response, REASON_TOO_SLOW, now);
        }

        let suspicious_note = self.latency_note(response.response_time_ms);
        if let Some(note) = &suspicious_note {
            warn!(
                node_id = %response.node_id,
                response_time_ms = response.response_time_ms,
                "{note}"
            );
        }

        VerificationResult {
            challenge_id: response.challenge_id,
            node_id: response.node_id,
            passed: true,
            response_time_ms: response.response_time_ms,
            failure_reason: None,
            suspicious: suspicious_note.is_some(),
            suspicious_note,
            timestamp: now,
        }
    }

    /// Single-shot verification for nodes that expose their own RPC
    /// endpoint: the server asks both sides the same fresh question and
    /// measures the candidate's latency itself, so there is no pending
    /// bookkeeping and no "not found" failure class on this path.
    pub async fn verify_exposed_rpc(&self, node: &NodeRecord) -> EngineResult<VerificationResult> {
        self.ensure_eligible(node)?;

        let now = Utc::now().timestamp_millis();

        let Some(endpoint) = node.rpc_endpoint.as_deref() else {
            return Ok(VerificationResult {
                challenge_id: Uuid::new_v4(),
                node_id: node.id,
                passed: false,
                response_time_ms: 0,
                failure_reason: Some(REASON_NO_ENDPOINT.to_string()),
                suspicious: false,
                suspicious_note: None,
                timestamp: now,
            });
        };

        let candidate = self.connector.connect(endpoint, node.auth_token.as_deref());
        let challenge = self.generator.generate(node.id, node.tier);

        // Independent reads; the candidate call dominates overall latency.
        let (expected, answer) = tokio::join!(
            self.reference.execute(&challenge.kind),
            candidate.execute(&challenge.kind),
        );

        let expected = expected.map_err(|e| EngineError::OracleUnavailable { reason: e.reason })?;

        let answer = match answer {
            Ok(answer) => answer,
            Err(e) => {
                return Ok(self.failed_direct(&challenge, node.id, &e.reason, e.latency_ms, now))
            }
        };

        if !answers_match(&answer.value, &expected.value, &challenge.kind) {
            return Ok(self.failed_direct(
                &challenge,
                node.id,
                REASON_INCORRECT,
                answer.latency_ms,
                now,
            ));
        }

        if answer.latency_ms >= self.policy.hard_ceiling_ms {
            return Ok(self.failed_direct(
                &challenge,
                node.id,
                REASON_TOO_SLOW,
                answer.latency_ms,
                now,
            ));
        }

        let suspicious_note = self.latency_note(answer.latency_ms);

        Ok(VerificationResult {
            challenge_id: challenge.id,
            node_id: node.id,
            passed: true,
            response_time_ms: answer.latency_ms,
            failure_reason: None,
            suspicious: suspicious_note.is_some(),
            suspicious_note,
            timestamp: now,
        })
    }

    /// Liveness probe: head height, sync flag, peer count. No pass/fail
    /// semantics; `None` when the node has no endpoint or is unreachable.
    pub async fn check_heartbeat(&self, node: &NodeRecord) -> Option<HeartbeatRecord> {
        let endpoint = node.rpc_endpoint.as_deref()?;
        let gateway = self.connector.connect(endpoint, node.auth_token.as_deref());

        let head = gateway.block_number().await.ok()?;
        let is_synced = gateway
            .sync_status()
            .await
            .map(|t| t.value)
            .unwrap_or(false);
        let peer_count = gateway.peer_count().await.map(|t| t.value).unwrap_or(0);

        Some(HeartbeatRecord {
            node_id: node.id,
            timestamp: Utc::now().timestamp_millis(),
            block_height: head.value,
            is_synced,
            latency_ms: head.latency_ms,
            peer_count,
        })
    }

    /// Sweep the pending map, deleting challenges past expiry. Intended to
    /// run on a fixed interval so abandoned challenges do not accumulate.
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now().timestamp_millis();

        let mut pending = self.pending.write();
        let before = pending.len();
        pending.retain(|_, p| !p.challenge.is_expired(now));
        let removed = before - pending.len();

        if removed > 0 {
            info!(removed, "cleaned up expired challenges");
        }
        removed
    }

    /// Number of challenges currently awaiting an answer.
    pub fn pending_len(&self) -> usize {
        self.pending.read().len()
    }

    fn ensure_eligible(&self, node: &NodeRecord) -> EngineResult<()> {
        if node.trust.cheat_status == CheatStatus::Banned {
            return Err(EngineError::NodeExcluded {
                node_id: node.id,
                reason: "banned".to_string(),
            });
        }
        if !node.is_active {
            return Err(EngineError::NodeExcluded {
                node_id: node.id,
                reason: "inactive".to_string(),
            });
        }
        Ok(())
    }

    fn latency_note(&self, response_time_ms: u64) -> Option<String> {
        (response_time_ms > self.policy.suspicious_floor_ms).then(|| {
            format!(
                "response took {response_time_ms}ms; local nodes answer in under \
                 {LATENCY_LOCAL_NODE_MS}ms while public RPCs typically take \
                 {LATENCY_PUBLIC_RPC_MS}ms+, consistent with proxying through a public RPC"
            )
        })
    }

    fn failed(
        &self,
        response: &ChallengeResponse,
        reason: &str,
        now: i64,
    ) -> VerificationResult {
        VerificationResult {
            challenge_id: response.challenge_id,
            node_id: response.node_id,
            passed: false,
            response_time_ms: response.response_time_ms,
            failure_reason: Some(reason.to_string()),
            suspicious: false,
            suspicious_note: None,
            timestamp: now,
        }
    }

    fn failed_direct(
        &self,
        challenge: &Challenge,
        node_id: Uuid,
        reason: &str,
        latency_ms: u64,
        now: i64,
    ) -> VerificationResult {
        VerificationResult {
            challenge_id: challenge.id,
            node_id,
            passed: false,
            response_time_ms: latency_ms,
            failure_reason: Some(reason.to_string()),
            suspicious: false,
            suspicious_note: None,
            timestamp: now,
        }
    }

    #[cfg(test)]
    pub(crate) fn insert_pending(&self, challenge: Challenge, expected_answer: String) {
        self.pending.write().insert(
            challenge.id,
            PendingChallenge {
                challenge,
                expected_answer,
            },
        );
    }
}
