//! # Shared Types Crate
//!
//! This crate contains all domain entities shared across the NodeWatch
//! subsystems: node tiers and their reward policy, challenge kinds,
//! challenge/response/result records, heartbeats, and per-node trust state.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Tagged Challenge Kinds**: Challenge parameters live inside the
//!   [`ChallengeKind`] variant for the kind they belong to, so generators and
//!   comparators can be exhaustively type-checked.
//! - **Untrusted Input Stays Untrusted**: [`ChallengeResponse`] carries what
//!   the prover claims; nothing in this crate validates it.

pub mod entities;

pub use entities::*;
