//! The registry store: node records, histories, and point accrual.

use std::collections::{HashMap, VecDeque};

use chrono::Utc;
use parking_lot::RwLock;
use shared_types::{
    CheatStatus, HeartbeatRecord, NodeRecord, NodeStats, NodeTier, TrustState,
    VerificationMethod, VerificationResult, WalletStats,
};
use tracing::debug;
use uuid::Uuid;

use nw_trust::TrustStateMachine;

use crate::error::{RegistryError, RegistryResult};

/// Verification results kept per node; oldest dropped first.
pub const HISTORY_CAP: usize = 1000;

/// Heartbeats kept per node, about 24 hours at 5-minute intervals.
pub const HEARTBEAT_CAP: usize = 300;

// Uptime points accrue in 5-minute intervals, 12 per hour.
const INTERVALS_PER_HOUR: u64 = 12;

struct RegistryState {
    nodes: HashMap<Uuid, NodeRecord>,
    by_wallet: HashMap<String, Vec<Uuid>>,
    history: HashMap<Uuid, VecDeque<VerificationResult>>,
    heartbeats: HashMap<Uuid, VecDeque<HeartbeatRecord>>,
}

/// In-memory store for nodes and their verification data.
///
/// A single write lock guards the interior, so a verification result's
/// history append, counter updates, and trust transition land atomically.
pub struct NodeRegistry {
    machine: TrustStateMachine,
    state: RwLock<RegistryState>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::with_machine(TrustStateMachine::default())
    }

    pub fn with_machine(machine: TrustStateMachine) -> Self {
        Self {
            machine,
            state: RwLock::new(RegistryState {
                nodes: HashMap::new(),
                by_wallet: HashMap::new(),
                history: HashMap::new(),
                heartbeats: HashMap::new(),
            }),
        }
    }

    /// Register a new node. Grants the tier's registration bonus and starts
    /// the node active with a clean trust state.
    pub fn register_node(
        &self,
        wallet_address: &str,
        tier: NodeTier,
        verification_method: VerificationMethod,
        rpc_endpoint: Option<String>,
        auth_token: Option<String>,
    ) -> NodeRecord {
        let node = NodeRecord {
            id: Uuid::new_v4(),
            wallet_address: wallet_address.to_string(),
            tier,
            verification_method,
            rpc_endpoint,
            auth_token,
            registered_at: now_ms(),
            last_verified_at: None,
            last_heartbeat_at: None,
            total_challenges_passed: 0,
            total_challenges_failed: 0,
            total_uptime_minutes: 0,
            total_points: tier.registration_bonus(),
            is_active: true,
            trust: TrustState::default(),
        };

        let mut state = self.state.write();
        state
            .by_wallet
            .entry(node.wallet_address.clone())
            .or_default()
            .push(node.id);
        state.nodes.insert(node.id, node.clone());

        debug!(node_id = %node.id, tier = ?tier, "node registered");
        node
    }

    pub fn get_node(&self, node_id: Uuid) -> Option<NodeRecord> {
        self.state.read().nodes.get(&node_id).cloned()
    }

    pub fn nodes_by_wallet(&self, wallet_address: &str) -> Vec<NodeRecord> {
        let state = self.state.read();
        state
            .by_wallet
            .get(wallet_address)
            .into_iter()
            .flatten()
            .filter_map(|id| state.nodes.get(id).cloned())
            .collect()
    }

    pub fn active_nodes(&self) -> Vec<NodeRecord> {
        let state = self.state.read();
        state
            .nodes
            .values()
            .filter(|n| n.is_active)
            .cloned()
            .collect()
    }

    /// Record an adjudication outcome: bounded history append, pass/fail
    /// counters, and the trust transition, all under one lock.
    pub fn record_verification_result(&self, result: &VerificationResult) {
        let mut state = self.state.write();

        let history = state.history.entry(result.node_id).or_default();
        history.push_back(result.clone());
        while history.len() > HISTORY_CAP {
            history.pop_front();
        }

        if let Some(node) = state.nodes.get_mut(&result.node_id) {
            if result.passed {
                node.total_challenges_passed += 1;
            } else {
                node.total_challenges_failed += 1;
            }
            node.last_verified_at = Some(result.timestamp);

            self.machine.apply(&mut node.trust, result);
        }
    }

    /// Most recent verification results for a node, oldest first.
    pub fn verification_history(&self, node_id: Uuid, limit: usize) -> Vec<VerificationResult> {
        let state = self.state.read();
        let Some(history) = state.history.get(&node_id) else {
            return Vec::new();
        };
        let skip = history.len().saturating_sub(limit);
        history.iter().skip(skip).cloned().collect()
    }

    pub fn record_heartbeat(&self, heartbeat: &HeartbeatRecord) {
        let mut state = self.state.write();
        let history = state.heartbeats.entry(heartbeat.node_id).or_default();
        history.push_back(heartbeat.clone());
        while history.len() > HEARTBEAT_CAP {
            history.pop_front();
        }
    }

    /// Heartbeats at or after `since` (unix ms); all of them when `since`
    /// is 0.
    pub fn heartbeats_since(&self, node_id: Uuid, since: i64) -> Vec<HeartbeatRecord> {
        let state = self.state.read();
        state
            .heartbeats
            .get(&node_id)
            .map(|history| {
                history
                    .iter()
                    .filter(|h| h.timestamp >= since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Aggregate statistics over the node's last 24 hours of results.
    pub fn node_stats(&self, node_id: Uuid) -> Option<NodeStats> {
        let state = self.state.read();
        let node = state.nodes.get(&node_id)?;

        let day_ago = now_ms() - 24 * 60 * 60 * 1000;
        let mut recent = 0u64;
        let mut recent_passed = 0u64;
        let mut total_latency = 0u64;

        if let Some(history) = state.history.get(&node_id) {
            for result in history.iter().filter(|r| r.timestamp >= day_ago) {
                recent += 1;
                if result.passed {
                    recent_passed += 1;
                }
                total_latency += result.response_time_ms;
            }
        }

        let (pass_rate, avg_latency) = if recent > 0 {
            (
                recent_passed as f64 / recent as f64 * 100.0,
                total_latency as f64 / recent as f64,
            )
        } else {
            (0.0, 0.0)
        };

        Some(NodeStats {
            node_id: node.id,
            total_points: node.total_points,
            total_uptime_minutes: node.total_uptime_minutes,
            total_uptime_hours: node.total_uptime_minutes as f64 / 60.0,
            challenge_pass_rate: pass_rate,
            average_latency_ms: avg_latency,
            cheat_status: node.trust.cheat_status,
            warning_count: node.trust.warning_count,
        })
    }

    /// Wallet-level totals across all of a wallet's nodes.
    pub fn wallet_stats(&self, wallet_address: &str) -> Option<WalletStats> {
        let state = self.state.read();
        let node_ids = state.by_wallet.get(wallet_address)?;

        let mut total_points = 0;
        let mut active_nodes = 0;
        let mut flagged_nodes = 0;

        for id in node_ids {
            if let Some(node) = state.nodes.get(id) {
                total_points += node.total_points;
                if node.is_active {
                    active_nodes += 1;
                }
                if matches!(
                    node.trust.cheat_status,
                    CheatStatus::Warning | CheatStatus::Flagged
                ) {
                    flagged_nodes += 1;
                }
            }
        }

        Some(WalletStats {
            wallet_address: wallet_address.to_string(),
            total_points,
            total_nodes: node_ids.len(),
            active_nodes,
            flagged_nodes,
        })
    }

    /// Accrue uptime and points for an interval of verified liveness.
    /// Flagged and banned nodes accrue nothing; Warning and Clean continue.
    pub fn award_uptime_points(&self, node_id: Uuid, minutes_online: u64) {
        let mut state = self.state.write();
        let Some(node) = state.nodes.get_mut(&node_id) else {
            return;
        };

        if !node.is_active || !self.machine.rewards_eligible(node.trust.cheat_status) {
            debug!(node_id = %node_id, status = ?node.trust.cheat_status, "uptime points withheld");
            return;
        }

        node.total_uptime_minutes += minutes_online;
        node.last_heartbeat_at = Some(now_ms());

        // Hourly rate split across 5-minute intervals, floor of 1
        let points = (node.tier.points_per_hour() / INTERVALS_PER_HOUR).max(1);
        node.total_points += points;
    }

    /// Record a suspicious event observed outside of adjudication.
    pub fn add_suspicious_event(&self, node_id: Uuid, reason: &str) -> RegistryResult<()> {
        let mut state = self.state.write();
        let node = state
            .nodes
            .get_mut(&node_id)
            .ok_or(RegistryError::NodeNotFound { node_id })?;

        self.machine
            .record_suspicious(&mut node.trust, reason, now_ms());
        Ok(())
    }

    /// Nodes needing operator attention (Warning or Flagged).
    pub fn flagged_nodes(&self) -> Vec<NodeRecord> {
        let state = self.state.read();
        state
            .nodes
            .values()
            .filter(|n| {
                matches!(
                    n.trust.cheat_status,
                    CheatStatus::Warning | CheatStatus::Flagged
                )
            })
            .cloned()
            .collect()
    }

    /// Administrative status change. Clearing resets the warning count and
    /// event ring with the status; banning deactivates the node.
    pub fn set_cheat_status(
        &self,
        node_id: Uuid,
        status: CheatStatus,
        reason: Option<&str>,
    ) -> RegistryResult<()> {
        let mut state = self.state.write();
        let node = state
            .nodes
            .get_mut(&node_id)
            .ok_or(RegistryError::NodeNotFound { node_id })?;

        self.machine
            .admin_set_status(&mut node.trust, status, reason);

        if status == CheatStatus::Banned {
            node.is_active = false;
        }
        Ok(())
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
