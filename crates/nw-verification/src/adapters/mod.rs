//! Adapter implementations of the engine's ports.

pub mod json_rpc;

pub use json_rpc::{JsonRpcConnector, JsonRpcGateway};
