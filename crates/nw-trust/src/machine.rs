//! Pure trust-state transitions.

use chrono::DateTime;
use shared_types::{CheatStatus, TrustState, VerificationResult};

use crate::policy::EscalationPolicy;

/// Reason recorded when a node crosses the flagged threshold.
pub const FLAGGED_REASON: &str = "Multiple suspicious activities - needs manual review";

/// Fallback note when a suspicious result carries no explanation.
pub const DEFAULT_SUSPICIOUS_NOTE: &str = "Suspicious verification detected";

/// Applies verification outcomes and administrative actions to a node's
/// [`TrustState`].
///
/// The machine owns no state of its own; callers (the registry) hold the
/// per-node `TrustState` and apply transitions under their own lock.
#[derive(Debug, Default)]
pub struct TrustStateMachine {
    policy: EscalationPolicy,
}

impl TrustStateMachine {
    pub fn new(policy: EscalationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &EscalationPolicy {
        &self.policy
    }

    /// Apply one adjudication result.
    ///
    /// Clean passes and failures leave the state untouched; only suspicious
    /// results (which are always passes) escalate. Returns the status after
    /// application.
    pub fn apply(&self, state: &mut TrustState, result: &VerificationResult) -> CheatStatus {
        if result.suspicious {
            let note = result
                .suspicious_note
                .as_deref()
                .unwrap_or(DEFAULT_SUSPICIOUS_NOTE);
            self.record_suspicious(state, note, result.timestamp);
        }
        state.cheat_status
    }

    /// Record one suspicious event at the given unix-millisecond time:
    /// append to the ring, bump the warning count, escalate if a threshold
    /// was crossed.
    pub fn record_suspicious(&self, state: &mut TrustState, reason: &str, at_ms: i64) {
        state
            .suspicious_events
            .push_back(format!("{}: {}", format_event_time(at_ms), reason));
        while state.suspicious_events.len() > self.policy.event_ring_capacity {
            state.suspicious_events.pop_front();
        }

        state.warning_count += 1;

        if state.warning_count >= self.policy.flagged_threshold {
            self.escalate(state, CheatStatus::Flagged, FLAGGED_REASON);
        } else if state.warning_count >= self.policy.warning_threshold {
            self.escalate(state, CheatStatus::Warning, reason);
        }
    }

    /// Administrative clear: warning count, event ring, and status reset
    /// together. The one sanctioned downward transition.
    pub fn admin_clear(&self, state: &mut TrustState) {
        state.cheat_status = CheatStatus::Clean;
        state.warning_count = 0;
        state.cheat_reason = None;
        state.suspicious_events.clear();
    }

    /// Administrative ban. Unconditional and terminal until cleared.
    pub fn admin_ban(&self, state: &mut TrustState, reason: &str) {
        state.cheat_status = CheatStatus::Banned;
        state.cheat_reason = Some(reason.to_string());
    }

    /// Administrative status override. `Clean` performs a full clear and
    /// `Banned` a ban; intermediate statuses are set directly without
    /// touching the warning count.
    pub fn admin_set_status(
        &self,
        state: &mut TrustState,
        status: CheatStatus,
        reason: Option<&str>,
    ) {
        match status {
            CheatStatus::Clean => self.admin_clear(state),
            CheatStatus::Banned => self.admin_ban(state, reason.unwrap_or("banned by operator")),
            CheatStatus::Warning | CheatStatus::Flagged => {
                state.cheat_status = status;
                state.cheat_reason = reason.map(str::to_string);
            }
        }
    }

    /// Whether a node in this status may accrue uptime rewards.
    pub fn rewards_eligible(&self, status: CheatStatus) -> bool {
        !matches!(status, CheatStatus::Flagged | CheatStatus::Banned)
    }

    // Status only ever moves up outside of admin_clear.
    fn escalate(&self, state: &mut TrustState, status: CheatStatus, reason: &str) {
        if status > state.cheat_status {
            state.cheat_status = status;
            state.cheat_reason = Some(reason.to_string());
        }
    }
}

fn format_event_time(at_ms: i64) -> String {
    match DateTime::from_timestamp_millis(at_ms) {
        Some(time) => time.format("%Y-%m-%d %H:%M").to_string(),
        None => at_ms.to_string(),
    }
}
