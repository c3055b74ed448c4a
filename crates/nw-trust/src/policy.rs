//! Escalation thresholds, kept as named configuration so policy can be
//! tuned without touching the transition logic.

use shared_types::SUSPICIOUS_EVENT_CAP;

/// Warnings at which a node moves to `Warning`.
pub const DEFAULT_WARNING_THRESHOLD: u32 = 2;

/// Warnings at which a node moves to `Flagged` and stops accruing rewards.
pub const DEFAULT_FLAGGED_THRESHOLD: u32 = 5;

/// Escalation policy applied by the trust state machine.
#[derive(Debug, Clone)]
pub struct EscalationPolicy {
    /// Warning count from which status becomes `Warning`.
    pub warning_threshold: u32,
    /// Warning count from which status becomes `Flagged`.
    pub flagged_threshold: u32,
    /// Capacity of the suspicious-event ring; oldest entries are evicted.
    pub event_ring_capacity: usize,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            flagged_threshold: DEFAULT_FLAGGED_THRESHOLD,
            event_ring_capacity: SUSPICIOUS_EVENT_CAP,
        }
    }
}
