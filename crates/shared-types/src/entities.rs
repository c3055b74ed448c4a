//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Nodes**: [`NodeTier`], [`VerificationMethod`], [`NodeRecord`]
//! - **Challenges**: [`ChallengeKind`], [`Challenge`], [`ChallengeResponse`]
//! - **Adjudication**: [`VerificationResult`], [`HeartbeatRecord`]
//! - **Trust**: [`CheatStatus`], [`TrustState`]

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: NODES
// =============================================================================

/// Sync depth a registered node claims to run at.
///
/// The tier bounds which challenge kinds the node can fairly be asked and
/// sets its reward rates. An unrecognized tier deserializes to [`Unknown`]
/// and is treated as the most restrictive tier rather than rejected.
///
/// [`Unknown`]: NodeTier::Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeTier {
    BscFull,
    BscFast,
    BscArchive,
    OpbnbFull,
    OpbnbFast,
    /// Catch-all for tiers this build does not know about.
    #[serde(other)]
    Unknown,
}

impl NodeTier {
    /// One-time points granted for registering a synced node.
    pub fn registration_bonus(&self) -> u64 {
        match self {
            // Archive nodes are hardest to run
            NodeTier::BscArchive => 100,
            NodeTier::BscFull => 50,
            NodeTier::BscFast => 40,
            NodeTier::OpbnbFull => 40,
            NodeTier::OpbnbFast => 30,
            NodeTier::Unknown => 0,
        }
    }

    /// Base points per hour of verified uptime.
    pub fn points_per_hour(&self) -> u64 {
        match self {
            NodeTier::BscArchive => 10,
            NodeTier::BscFull => 6,
            NodeTier::BscFast => 4,
            NodeTier::OpbnbFull => 4,
            NodeTier::OpbnbFast => 3,
            NodeTier::Unknown => 0,
        }
    }

    /// Minimum uptime percentage expected of this tier.
    pub fn min_uptime_percent(&self) -> u8 {
        match self {
            NodeTier::BscArchive | NodeTier::BscFull => 95,
            NodeTier::BscFast | NodeTier::OpbnbFull => 90,
            NodeTier::OpbnbFast => 85,
            NodeTier::Unknown => 90,
        }
    }

    /// How often this tier should receive a verification challenge.
    pub fn challenge_frequency_minutes(&self) -> u64 {
        match self {
            NodeTier::BscArchive | NodeTier::BscFull => 30,
            _ => 60,
        }
    }
}

/// How a node's answers are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationMethod {
    /// The node exposes its own RPC endpoint; the server queries it directly.
    ExposedRpc,
    /// A prover process co-located with the node fetches and submits answers.
    LocalProver,
}

// =============================================================================
// CLUSTER B: CHALLENGES
// =============================================================================

/// Fixed lifetime of a challenge, in milliseconds.
///
/// Short enough that pre-computed answers from a public RPC are impractical,
/// long enough for a legitimately slow home connection to respond.
pub const CHALLENGE_TTL_MS: i64 = 60_000;

/// A challenge kind together with its kind-specific parameters.
///
/// Tagged so that each consumer can match exhaustively; there is no
/// open-ended parameter dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ChallengeKind {
    /// Hash of the block at the given height.
    BlockHash { height: u64 },
    /// Selected header fields of the block at the given height.
    HeaderFields { height: u64 },
    /// Balance of a known contract address at a historical height.
    BalanceAtHeight { height: u64, address: String },
    /// Whether the node reports itself fully synced.
    SyncStatus,
}

impl ChallengeKind {
    /// Wire name of the kind, matching its serialized tag.
    pub fn name(&self) -> &'static str {
        match self {
            ChallengeKind::BlockHash { .. } => "block-hash",
            ChallengeKind::HeaderFields { .. } => "header-fields",
            ChallengeKind::BalanceAtHeight { .. } => "balance-at-height",
            ChallengeKind::SyncStatus => "sync-status",
        }
    }
}

/// A question issued to a node to prove it is really answering queries.
///
/// Immutable once created. The expected answer is held privately by the
/// verification engine, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: Uuid,
    pub node_id: Uuid,
    #[serde(flatten)]
    pub kind: ChallengeKind,
    /// Creation time, unix milliseconds.
    pub created_at: i64,
    /// Absolute expiry, `created_at + CHALLENGE_TTL_MS`.
    pub expires_at: i64,
}

impl Challenge {
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at
    }
}

/// A prover's submitted answer. Untrusted input.
///
/// The signature is verified by the inbound authentication layer before the
/// response reaches the verification engine; `node_id` is therefore trusted
/// to belong to the submitting wallet, but nothing else is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub challenge_id: Uuid,
    pub node_id: Uuid,
    pub answer: String,
    /// Wallet signature over the submission. Opaque at this layer.
    pub signature: String,
    /// Round-trip time the prover claims it took to answer locally.
    pub response_time_ms: u64,
    /// Submission time, unix milliseconds.
    pub timestamp: i64,
}

// =============================================================================
// CLUSTER C: ADJUDICATION
// =============================================================================

/// Latency bands for anti-cheat classification, in milliseconds.
///
/// A node answering from local disk sits under [`LATENCY_LOCAL_NODE_MS`];
/// round-tripping through a public RPC typically costs
/// [`LATENCY_PUBLIC_RPC_MS`] or more. Between the suspicious floor and the
/// hard ceiling an answer still passes but is flagged, since honest network
/// jitter alone can cross the floor.
pub const LATENCY_LOCAL_NODE_MS: u64 = 100;
pub const LATENCY_SUSPICIOUS_MIN_MS: u64 = 150;
pub const LATENCY_PUBLIC_RPC_MS: u64 = 300;
pub const LATENCY_MAX_ALLOWED_MS: u64 = 5000;

/// Outcome of adjudicating one challenge. Immutable; appended to the
/// per-node history by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub challenge_id: Uuid,
    pub node_id: Uuid,
    pub passed: bool,
    pub response_time_ms: u64,
    /// Populated on failure only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    /// Set only on passing results whose timing looks like proxying.
    pub suspicious: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspicious_note: Option<String>,
    /// Adjudication time, unix milliseconds.
    pub timestamp: i64,
}

/// Lightweight liveness probe result. No pass/fail semantics; used purely
/// for uptime accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatRecord {
    pub node_id: Uuid,
    pub timestamp: i64,
    pub block_height: u64,
    pub is_synced: bool,
    pub latency_ms: u64,
    pub peer_count: u64,
}

// =============================================================================
// CLUSTER D: TRUST
// =============================================================================

/// Anti-cheat status of a node. Ordered by severity, so escalation can be
/// expressed as "never move to a lower status".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheatStatus {
    /// No issues.
    Clean,
    /// Suspicious activity detected.
    Warning,
    /// Needs manual review by an operator.
    Flagged,
    /// Confirmed cheating. Terminal until an explicit administrative clear.
    Banned,
}

/// Capacity of the per-node suspicious-event ring.
pub const SUSPICIOUS_EVENT_CAP: usize = 20;

/// Per-node escalation state, mutated only through the trust state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustState {
    pub cheat_status: CheatStatus,
    pub warning_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cheat_reason: Option<String>,
    /// Most recent suspicious-event descriptions, oldest evicted first.
    pub suspicious_events: VecDeque<String>,
}

impl Default for TrustState {
    fn default() -> Self {
        Self {
            cheat_status: CheatStatus::Clean,
            warning_count: 0,
            cheat_reason: None,
            suspicious_events: VecDeque::new(),
        }
    }
}

// =============================================================================
// CLUSTER E: REGISTRY RECORDS
// =============================================================================

/// A registered node and its accumulated accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: Uuid,
    pub wallet_address: String,
    pub tier: NodeTier,
    pub verification_method: VerificationMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    pub registered_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_verified_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_heartbeat_at: Option<i64>,
    pub total_challenges_passed: u64,
    pub total_challenges_failed: u64,
    pub total_uptime_minutes: u64,
    pub total_points: u64,
    pub is_active: bool,
    #[serde(flatten)]
    pub trust: TrustState,
}

/// Aggregate statistics for one node over its recent history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStats {
    pub node_id: Uuid,
    pub total_points: u64,
    pub total_uptime_minutes: u64,
    pub total_uptime_hours: f64,
    /// Pass rate over the last 24 hours, in percent.
    pub challenge_pass_rate: f64,
    pub average_latency_ms: f64,
    pub cheat_status: CheatStatus,
    pub warning_count: u32,
}

/// Wallet-level statistics; a wallet can operate multiple nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletStats {
    pub wallet_address: String,
    pub total_points: u64,
    pub total_nodes: usize,
    pub active_nodes: usize,
    pub flagged_nodes: usize,
}
