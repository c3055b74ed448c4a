//! # NodeWatch Test Suite
//!
//! Unified test crate covering cross-crate flows:
//!
//! ```text
//! tests/src/
//! ├── support.rs        # Shared mock gateways and fixtures
//! └── integration/
//!     ├── verification_flow.rs   # Challenge round-trips and races
//!     └── trust_escalation.rs    # Results → registry → trust state
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p nw-tests
//! cargo test -p nw-tests integration::
//! ```

#![allow(dead_code)]

pub mod integration;
pub mod support;
