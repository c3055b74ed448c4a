//! # Verification Flow Integration
//!
//! Drives the full challenge lifecycle across nw-challenge and
//! nw-verification: issue against a scripted oracle, answer as a prover,
//! race duplicate submissions, and sweep expired challenges.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use shared_types::{
        ChallengeResponse, NodeTier, VerificationMethod, CHALLENGE_TTL_MS,
    };
    use uuid::Uuid;

    use nw_verification::{
        EngineError, VerificationEngine, REASON_NOT_FOUND,
    };

    use crate::support::{node_fixture, ScriptedConnector, ScriptedGateway};

    type TestEngine = VerificationEngine<ScriptedGateway, ScriptedConnector>;

    fn engine(reference_answer: &str, candidate_answer: &str, candidate_latency: u64) -> TestEngine {
        VerificationEngine::new(
            Arc::new(ScriptedGateway::answering(reference_answer, 25)),
            ScriptedConnector::answering(candidate_answer, candidate_latency),
        )
    }

    fn answer(challenge_id: Uuid, node_id: Uuid, text: &str, response_time_ms: u64) -> ChallengeResponse {
        ChallengeResponse {
            challenge_id,
            node_id,
            answer: text.to_string(),
            signature: "0xsig".to_string(),
            response_time_ms,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    // =========================================================================
    // PROVER ROUND-TRIP
    // =========================================================================

    #[tokio::test]
    async fn test_challenge_round_trip_passes() {
        let engine = engine("0xfeed", "0xfeed", 30);
        let node = node_fixture(NodeTier::BscArchive, VerificationMethod::LocalProver);

        let challenge = engine.create_challenge(&node).await.unwrap();
        assert_eq!(challenge.expires_at - challenge.created_at, CHALLENGE_TTL_MS);

        let result = engine.verify_response(&answer(challenge.id, node.id, "0xfeed", 60));

        assert!(result.passed);
        assert!(!result.suspicious);
        assert!(result.failure_reason.is_none());
    }

    #[tokio::test]
    async fn test_round_trip_wrong_answer_fails_and_consumes() {
        let engine = engine("0xfeed", "0xfeed", 30);
        let node = node_fixture(NodeTier::BscFull, VerificationMethod::LocalProver);

        let challenge = engine.create_challenge(&node).await.unwrap();

        let wrong = engine.verify_response(&answer(challenge.id, node.id, "0xbad", 60));
        assert!(!wrong.passed);

        // The challenge was consumed by the first attempt
        let retry = engine.verify_response(&answer(challenge.id, node.id, "0xfeed", 60));
        assert_eq!(retry.failure_reason.as_deref(), Some(REASON_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_suspicious_latency_passes_with_flag() {
        let engine = engine("0xfeed", "0xfeed", 30);
        let node = node_fixture(NodeTier::BscFull, VerificationMethod::LocalProver);

        let challenge = engine.create_challenge(&node).await.unwrap();
        let result = engine.verify_response(&answer(challenge.id, node.id, "0xfeed", 900));

        assert!(result.passed);
        assert!(result.suspicious);
        assert!(result.suspicious_note.is_some());
    }

    // =========================================================================
    // CONCURRENT DOUBLE-SUBMISSION
    // =========================================================================

    /// Two submissions race on one challenge id; exactly one adjudicates
    /// regardless of arrival order.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_resolve_exactly_once() {
        for _ in 0..20 {
            let engine = Arc::new(engine("0xfeed", "0xfeed", 30));
            let node = node_fixture(NodeTier::BscFull, VerificationMethod::LocalProver);

            let challenge = engine.create_challenge(&node).await.unwrap();

            let first = {
                let engine = Arc::clone(&engine);
                let response = answer(challenge.id, node.id, "0xfeed", 60);
                tokio::spawn(async move { engine.verify_response(&response) })
            };
            let second = {
                let engine = Arc::clone(&engine);
                let response = answer(challenge.id, node.id, "0xfeed", 60);
                tokio::spawn(async move { engine.verify_response(&response) })
            };

            let (a, b) = (first.await.unwrap(), second.await.unwrap());

            let passes = [&a, &b].iter().filter(|r| r.passed).count();
            assert_eq!(passes, 1, "exactly one submission may pass");

            let loser = if a.passed { &b } else { &a };
            assert_eq!(loser.failure_reason.as_deref(), Some(REASON_NOT_FOUND));
        }
    }

    // =========================================================================
    // EXPOSED-RPC PATH
    // =========================================================================

    #[tokio::test]
    async fn test_exposed_rpc_round_trip() {
        let engine = engine("0xfeed", "0xfeed", 40);
        let node = node_fixture(NodeTier::BscFull, VerificationMethod::ExposedRpc);

        let result = engine.verify_exposed_rpc(&node).await.unwrap();

        assert!(result.passed);
        assert_eq!(result.response_time_ms, 40);
        // Direct verification leaves no pending bookkeeping behind
        assert_eq!(engine.pending_len(), 0);
    }

    #[tokio::test]
    async fn test_exposed_rpc_detects_divergent_answers() {
        let engine = engine("0xfeed", "0xforged", 40);
        let node = node_fixture(NodeTier::BscFull, VerificationMethod::ExposedRpc);

        let result = engine.verify_exposed_rpc(&node).await.unwrap();

        assert!(!result.passed);
        assert_eq!(result.failure_reason.as_deref(), Some("incorrect answer"));
    }

    #[tokio::test]
    async fn test_oracle_outage_is_operational_error_not_node_failure() {
        let engine = VerificationEngine::new(
            Arc::new(ScriptedGateway::unreachable()),
            ScriptedConnector::answering("0xfeed", 40),
        );
        let node = node_fixture(NodeTier::BscFull, VerificationMethod::ExposedRpc);

        assert!(matches!(
            engine.create_challenge(&node).await.unwrap_err(),
            EngineError::OracleUnavailable { .. }
        ));
        assert!(matches!(
            engine.verify_exposed_rpc(&node).await.unwrap_err(),
            EngineError::OracleUnavailable { .. }
        ));
    }

    // =========================================================================
    // EXPIRY SWEEP
    // =========================================================================

    #[tokio::test]
    async fn test_cleanup_leaves_live_challenges_alone() {
        let engine = engine("0xfeed", "0xfeed", 30);
        let node = node_fixture(NodeTier::BscFull, VerificationMethod::LocalProver);

        let challenge = engine.create_challenge(&node).await.unwrap();
        assert_eq!(engine.pending_len(), 1);

        // Freshly created challenges survive a sweep
        assert_eq!(engine.cleanup_expired(), 0);
        assert_eq!(engine.pending_len(), 1);

        let result = engine.verify_response(&answer(challenge.id, node.id, "0xfeed", 60));
        assert!(result.passed);
        assert_eq!(engine.pending_len(), 0);
    }

    #[tokio::test]
    async fn test_tier_restriction_survives_full_stack() {
        let engine = engine("0xfeed", "0xfeed", 30);
        let node = node_fixture(NodeTier::OpbnbFast, VerificationMethod::LocalProver);

        for _ in 0..50 {
            let challenge = engine.create_challenge(&node).await.unwrap();
            assert!(matches!(
                challenge.kind,
                shared_types::ChallengeKind::BlockHash { .. }
                    | shared_types::ChallengeKind::SyncStatus
            ));
            // Consume so the pending map does not grow unboundedly
            engine.verify_response(&answer(challenge.id, node.id, "0xfeed", 60));
        }
    }
}
