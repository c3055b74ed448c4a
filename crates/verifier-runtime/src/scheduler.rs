//! Periodic sweeps: challenge cleanup, exposed-RPC verification, and
//! heartbeat/uptime accrual.
//!
//! Each sweep runs as its own tokio task on a fixed interval and stops when
//! the shutdown signal flips. Sweep bodies are free functions so a single
//! pass can be driven directly in tests.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use nw_registry::NodeRegistry;
use nw_verification::{GatewayFactory, RpcGateway, VerificationEngine};
use shared_types::{NodeRecord, VerificationMethod};

use crate::config::RuntimeConfig;

/// Whether a node is due for another verification pass, given its tier's
/// challenge frequency.
pub fn verification_due(node: &NodeRecord, now_ms: i64) -> bool {
    let frequency_ms = node.tier.challenge_frequency_minutes() as i64 * 60_000;
    match node.last_verified_at {
        None => true,
        Some(last) => now_ms - last >= frequency_ms,
    }
}

/// One pass over active exposed-RPC nodes that are due for verification.
pub async fn run_verification_sweep<G, F>(
    engine: &VerificationEngine<G, F>,
    registry: &NodeRegistry,
) where
    G: RpcGateway,
    F: GatewayFactory,
{
    let now = Utc::now().timestamp_millis();

    for node in registry.active_nodes() {
        if node.verification_method != VerificationMethod::ExposedRpc {
            continue;
        }
        if !verification_due(&node, now) {
            continue;
        }

        match engine.verify_exposed_rpc(&node).await {
            Ok(result) => {
                info!(
                    node_id = %node.id,
                    passed = result.passed,
                    suspicious = result.suspicious,
                    "verification sweep adjudicated"
                );
                registry.record_verification_result(&result);
            }
            Err(e) => {
                // Oracle trouble is our problem, not the node's; skip the
                // node rather than fail it.
                warn!(node_id = %node.id, error = %e, "verification sweep skipped node");
            }
        }
    }
}

/// One pass of liveness probes. A synced heartbeat accrues uptime for the
/// interval that elapsed since the last sweep.
pub async fn run_heartbeat_sweep<G, F>(
    engine: &VerificationEngine<G, F>,
    registry: &NodeRegistry,
    interval_minutes: u64,
) where
    G: RpcGateway,
    F: GatewayFactory,
{
    for node in registry.active_nodes() {
        match engine.check_heartbeat(&node).await {
            Some(heartbeat) => {
                if heartbeat.is_synced {
                    registry.award_uptime_points(node.id, interval_minutes);
                }
                registry.record_heartbeat(&heartbeat);
            }
            None => {
                debug!(node_id = %node.id, "heartbeat unreachable");
            }
        }
    }
}

/// Spawn the three background sweeps. Tasks exit when `shutdown` flips to
/// true.
pub fn spawn_sweeps<G, F>(
    engine: Arc<VerificationEngine<G, F>>,
    registry: Arc<NodeRegistry>,
    config: RuntimeConfig,
    shutdown: watch::Receiver<bool>,
) -> Vec<JoinHandle<()>>
where
    G: RpcGateway + 'static,
    F: GatewayFactory + 'static,
    F::Gateway: 'static,
{
    let mut handles = Vec::new();

    {
        let engine = Arc::clone(&engine);
        let mut shutdown = shutdown.clone();
        let mut interval = tokio::time::interval(config.cleanup_interval);
        handles.push(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        engine.cleanup_expired();
                    }
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
        }));
    }

    {
        let engine = Arc::clone(&engine);
        let registry = Arc::clone(&registry);
        let mut shutdown = shutdown.clone();
        let mut interval = tokio::time::interval(config.verification_interval);
        handles.push(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        run_verification_sweep(engine.as_ref(), registry.as_ref()).await;
                    }
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
        }));
    }

    {
        let interval_minutes = (config.heartbeat_interval.as_secs() / 60).max(1);
        let mut shutdown = shutdown.clone();
        let mut interval = tokio::time::interval(config.heartbeat_interval);
        handles.push(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        run_heartbeat_sweep(
                            engine.as_ref(),
                            registry.as_ref(),
                            interval_minutes,
                        )
                        .await;
                    }
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
        }));
    }

    handles
}
