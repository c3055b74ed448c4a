//! # nw-verification
//!
//! Verification Engine for NodeWatch: challenge issuance, oracle-based
//! answer adjudication, and latency-based anti-cheat classification.
//!
//! ## Overview
//!
//! ```text
//! Generator ──challenge──→ Engine ──same query──→ Reference node (oracle)
//!                            │                        │
//!                            │←──── expected answer ──┘
//!                            │
//!       prover answer ──────→│ adjudicate: found? fresh? correct? fast?
//!                            │
//!                            └──→ VerificationResult { passed, suspicious }
//! ```
//!
//! Two adjudication paths share one comparator and latency policy:
//!
//! - **Prover path**: the node submits an answer with a self-reported
//!   round-trip time; the engine holds the expected answer in a pending map
//!   until the first submission or expiry (at-most-one adjudication per
//!   challenge id).
//! - **Exposed-RPC path**: the server queries the node's own endpoint and
//!   measures latency itself; no pending bookkeeping exists to go stale.
//!
//! A correct answer slower than the suspicious floor still passes but is
//! flagged, feeding the trust state machine; at the hard ceiling it fails.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{JsonRpcConnector, JsonRpcGateway};
pub use domain::answers_match;
pub use error::{EngineError, EngineResult, GatewayError};
pub use ports::{GatewayFactory, RpcGateway, Timed};
pub use service::{
    LatencyPolicy, VerificationEngine, REASON_EXPIRED, REASON_INCORRECT, REASON_NOT_FOUND,
    REASON_NO_ENDPOINT, REASON_TOO_SLOW,
};
