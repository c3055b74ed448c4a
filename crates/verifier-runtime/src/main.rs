//! # NodeWatch Verifier Runtime
//!
//! The main entry point for the NodeWatch verification service.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (env-filtered `tracing` subscriber)
//! 2. Load configuration from the environment
//! 3. Connect the reference gateway and build the verification engine
//! 4. Create the node registry
//! 5. Spawn the background sweeps (cleanup, verification, heartbeat)
//! 6. Run until ctrl-c, then signal the sweeps to stop
//!
//! ## Wiring
//!
//! ```text
//! RuntimeConfig ──→ JsonRpcConnector ──reference──→ VerificationEngine
//!                                                        │
//!                         sweeps (tokio intervals) ──────┤
//!                                                        ↓
//!                                                  NodeRegistry
//! ```
//!
//! The HTTP surface (registration, challenge submission, wallet auth) is an
//! external collaborator; this binary owns everything behind it.

mod config;
mod scheduler;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use nw_registry::NodeRegistry;
use nw_verification::{GatewayFactory, JsonRpcConnector, VerificationEngine};

use crate::config::RuntimeConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RuntimeConfig::from_env();

    info!("===========================================");
    info!("  NodeWatch Verification Service v0.1.0");
    info!("===========================================");
    info!(trusted_rpc = %config.trusted_rpc_endpoint, "reference oracle configured");

    let connector = JsonRpcConnector::new().context("building JSON-RPC client")?;
    let reference = Arc::new(connector.connect(&config.trusted_rpc_endpoint, None));
    let engine = Arc::new(VerificationEngine::new(reference, connector));
    let registry = Arc::new(NodeRegistry::new());

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let sweeps = scheduler::spawn_sweeps(
        Arc::clone(&engine),
        Arc::clone(&registry),
        config,
        shutdown_rx,
    );

    info!("verifier ready");

    tokio::signal::ctrl_c()
        .await
        .context("listening for shutdown signal")?;

    info!("shutting down");
    shutdown_tx.send(true).ok();
    for sweep in sweeps {
        sweep.await.ok();
    }

    Ok(())
}
