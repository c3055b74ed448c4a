//! # nw-trust
//!
//! Trust State Machine for the NodeWatch verification service.
//!
//! ## Overview
//!
//! Consumes adjudication results over time and escalates a node's
//! cheat-status through Clean → Warning → Flagged, with Banned reserved for
//! administrative action:
//!
//! ```text
//! [CLEAN] ──2nd suspicious──→ [WARNING] ──5th suspicious──→ [FLAGGED]
//!    ↑                            │                             │
//!    └────── administrative clear ┴─────────────────────────────┘
//!
//! [any] ──administrative ban──→ [BANNED] ──clear──→ [CLEAN]
//! ```
//!
//! Transitions are pure and deterministic: the machine mutates a
//! [`shared_types::TrustState`] in place and never touches a clock; event
//! times come in as unix-millisecond arguments. Status moves are monotonic
//! except through the explicit administrative clear.

pub mod machine;
pub mod policy;

pub use machine::{TrustStateMachine, DEFAULT_SUSPICIOUS_NOTE, FLAGGED_REASON};
pub use policy::EscalationPolicy;
