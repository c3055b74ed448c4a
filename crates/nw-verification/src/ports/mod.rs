//! Ports connecting the engine to the outside world.

pub mod outbound;

pub use outbound::{GatewayFactory, RpcGateway, Timed};
