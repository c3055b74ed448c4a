//! # nw-registry
//!
//! In-memory node registry and points ledger for NodeWatch.
//!
//! ## Overview
//!
//! Owns every [`shared_types::NodeRecord`] and its bounded histories, and is
//! the only component that mutates trust state, applying the
//! [`nw_trust::TrustStateMachine`] transition under its own lock atomically
//! with history appends and counter updates.
//!
//! All state is in-memory and ephemeral; durability is a non-goal. The
//! registry is an explicitly constructed object passed by reference, so its
//! lifetime is tied to the server instance that created it.

pub mod error;
pub mod store;

pub use error::{RegistryError, RegistryResult};
pub use store::{NodeRegistry, HEARTBEAT_CAP, HISTORY_CAP};
