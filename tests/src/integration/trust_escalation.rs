//! # Trust Escalation Integration
//!
//! Verification results flow through the registry's trust transitions:
//! suspicious passes escalate Clean → Warning → Flagged, reward accrual is
//! gated, and administrative actions reset or terminate the ladder.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use shared_types::{CheatStatus, NodeTier, VerificationMethod, VerificationResult};
    use uuid::Uuid;

    use nw_registry::NodeRegistry;
    use nw_trust::FLAGGED_REASON;
    use nw_verification::{EngineError, VerificationEngine};

    use crate::support::{ScriptedConnector, ScriptedGateway};

    fn suspicious_pass(node_id: Uuid) -> VerificationResult {
        VerificationResult {
            challenge_id: Uuid::new_v4(),
            node_id,
            passed: true,
            response_time_ms: 320,
            failure_reason: None,
            suspicious: true,
            suspicious_note: Some("latency consistent with proxying".to_string()),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    fn clean_pass(node_id: Uuid) -> VerificationResult {
        VerificationResult {
            challenge_id: Uuid::new_v4(),
            node_id,
            passed: true,
            response_time_ms: 35,
            failure_reason: None,
            suspicious: false,
            suspicious_note: None,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    fn register(registry: &NodeRegistry) -> Uuid {
        registry
            .register_node(
                "0x2222222222222222222222222222222222222222",
                NodeTier::BscFull,
                VerificationMethod::ExposedRpc,
                Some("http://127.0.0.1:8545".to_string()),
                None,
            )
            .id
    }

    #[test]
    fn test_escalation_ladder() {
        let registry = NodeRegistry::new();
        let node_id = register(&registry);

        registry.record_verification_result(&suspicious_pass(node_id));
        assert_eq!(
            registry.get_node(node_id).unwrap().trust.cheat_status,
            CheatStatus::Clean
        );

        registry.record_verification_result(&suspicious_pass(node_id));
        assert_eq!(
            registry.get_node(node_id).unwrap().trust.cheat_status,
            CheatStatus::Warning
        );

        for _ in 0..3 {
            registry.record_verification_result(&suspicious_pass(node_id));
        }
        let node = registry.get_node(node_id).unwrap();
        assert_eq!(node.trust.cheat_status, CheatStatus::Flagged);
        assert_eq!(node.trust.warning_count, 5);
        assert_eq!(node.trust.cheat_reason.as_deref(), Some(FLAGGED_REASON));
    }

    #[test]
    fn test_clean_passes_never_escalate() {
        let registry = NodeRegistry::new();
        let node_id = register(&registry);

        for _ in 0..10 {
            registry.record_verification_result(&clean_pass(node_id));
        }

        let node = registry.get_node(node_id).unwrap();
        assert_eq!(node.trust.cheat_status, CheatStatus::Clean);
        assert_eq!(node.trust.warning_count, 0);
        assert_eq!(node.total_challenges_passed, 10);
    }

    #[test]
    fn test_flagged_node_stops_earning() {
        let registry = NodeRegistry::new();
        let node_id = register(&registry);

        for _ in 0..5 {
            registry.record_verification_result(&suspicious_pass(node_id));
        }
        let points_when_flagged = registry.get_node(node_id).unwrap().total_points;

        registry.award_uptime_points(node_id, 5);
        assert_eq!(
            registry.get_node(node_id).unwrap().total_points,
            points_when_flagged
        );

        // An administrative clear restores accrual
        registry
            .set_cheat_status(node_id, CheatStatus::Clean, None)
            .unwrap();
        registry.award_uptime_points(node_id, 5);
        assert!(registry.get_node(node_id).unwrap().total_points > points_when_flagged);
    }

    #[test]
    fn test_admin_clear_resets_ladder() {
        let registry = NodeRegistry::new();
        let node_id = register(&registry);

        for _ in 0..5 {
            registry.record_verification_result(&suspicious_pass(node_id));
        }
        registry
            .set_cheat_status(node_id, CheatStatus::Clean, None)
            .unwrap();

        let node = registry.get_node(node_id).unwrap();
        assert_eq!(node.trust.cheat_status, CheatStatus::Clean);
        assert_eq!(node.trust.warning_count, 0);
        assert!(node.trust.suspicious_events.is_empty());

        // The ladder starts over: one new event stays Clean
        registry.record_verification_result(&suspicious_pass(node_id));
        assert_eq!(
            registry.get_node(node_id).unwrap().trust.cheat_status,
            CheatStatus::Clean
        );
    }

    #[tokio::test]
    async fn test_banned_node_is_refused_challenges() {
        let registry = NodeRegistry::new();
        let node_id = register(&registry);
        registry
            .set_cheat_status(node_id, CheatStatus::Banned, Some("wallet cluster abuse"))
            .unwrap();

        let engine = VerificationEngine::new(
            Arc::new(ScriptedGateway::answering("0xfeed", 25)),
            ScriptedConnector::answering("0xfeed", 30),
        );

        let banned = registry.get_node(node_id).unwrap();
        assert!(!banned.is_active);

        let err = engine.create_challenge(&banned).await.unwrap_err();
        assert!(matches!(err, EngineError::NodeExcluded { .. }));
    }

    #[test]
    fn test_suspicious_ring_visible_in_record() {
        let registry = NodeRegistry::new();
        let node_id = register(&registry);

        for _ in 0..25 {
            registry.record_verification_result(&suspicious_pass(node_id));
        }

        let node = registry.get_node(node_id).unwrap();
        assert_eq!(node.trust.suspicious_events.len(), 20);
        assert_eq!(node.trust.warning_count, 25);
        assert_eq!(node.trust.cheat_status, CheatStatus::Flagged);
    }
}
