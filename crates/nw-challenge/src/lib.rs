//! # nw-challenge
//!
//! Challenge Generator for the NodeWatch verification engine.
//!
//! ## Overview
//!
//! Produces randomized, tier-appropriate challenges with a bounded lifetime:
//!
//! - **Kind selection**: uniform over the subset a tier can legitimately
//!   answer (archive nodes keep all historical state; fast nodes only recent
//!   blocks).
//! - **Safe height ranges**: old enough to be irreversible, recent enough to
//!   exist on every sync level queried.
//! - **Known addresses**: balance probes target perpetually-active contracts
//!   so the reference answer is never "account does not exist".
//!
//! Generation has no failure modes: an unrecognized tier is treated as the
//! most restrictive tier, never rejected.

pub mod generator;
pub mod policy;

pub use generator::ChallengeGenerator;
pub use policy::{block_range, permitted_kinds, BlockRange, KindSelector};
