//! Ethereum JSON-RPC implementation of the [`RpcGateway`] port.
//!
//! One gateway wraps one node endpoint. Every call measures its own
//! wall-clock latency and carries a 5-second timeout, so a stalled node
//! surfaces as a timed-out [`GatewayError`] rather than a hung adjudication.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::ChallengeKind;

use crate::error::GatewayError;
use crate::ports::{GatewayFactory, RpcGateway, Timed};

/// Hard bound on any single RPC round-trip.
pub const RPC_TIMEOUT: Duration = Duration::from_secs(5);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcErrorBody>,
}

#[derive(Deserialize)]
struct JsonRpcErrorBody {
    message: String,
}

/// The header fields a header-fields challenge answers with.
///
/// Deliberately a small, stable subset: enough to prove the node holds the
/// block, small enough to compare cheaply.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockFields {
    pub hash: String,
    #[serde(rename = "parentHash")]
    pub parent_hash: String,
    #[serde(rename = "stateRoot")]
    pub state_root: String,
}

/// JSON-RPC gateway to a single node endpoint.
pub struct JsonRpcGateway {
    client: Client,
    endpoint: String,
    auth_token: Option<String>,
    request_id: AtomicU64,
}

impl JsonRpcGateway {
    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn call(&self, method: &str, params: Value) -> Result<Timed<Value>, GatewayError> {
        let started = Instant::now();

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id(),
            method,
            params,
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            let reason = if e.is_connect() {
                format!("cannot connect to {}", self.endpoint)
            } else if e.is_timeout() {
                format!("request to {} timed out", self.endpoint)
            } else {
                e.to_string()
            };
            GatewayError::new(reason, elapsed_ms(started))
        })?;

        let body: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::new(e.to_string(), elapsed_ms(started)))?;

        let latency_ms = elapsed_ms(started);

        if let Some(error) = body.error {
            return Err(GatewayError::new(error.message, latency_ms));
        }

        match body.result {
            Some(result) => Ok(Timed::new(result, latency_ms)),
            None => Err(GatewayError::new("missing result in response", latency_ms)),
        }
    }

    /// Fetch the comparison fields of a block.
    pub async fn block_by_number(&self, height: u64) -> Result<Timed<BlockFields>, GatewayError> {
        let result = self
            .call("eth_getBlockByNumber", json!([hex_quantity(height), false]))
            .await?;

        if result.value.is_null() {
            return Err(GatewayError::new(
                format!("block {height} not found"),
                result.latency_ms,
            ));
        }

        let fields: BlockFields = serde_json::from_value(result.value)
            .map_err(|e| GatewayError::new(e.to_string(), result.latency_ms))?;

        Ok(Timed::new(fields, result.latency_ms))
    }

    /// Balance of an address at a historical height, as a hex quantity.
    pub async fn balance_at(
        &self,
        address: &str,
        height: u64,
    ) -> Result<Timed<String>, GatewayError> {
        let result = self
            .call("eth_getBalance", json!([address, hex_quantity(height)]))
            .await?;
        let balance = expect_string(&result)?;
        Ok(Timed::new(balance, result.latency_ms))
    }
}

#[async_trait]
impl RpcGateway for JsonRpcGateway {
    async fn execute(&self, kind: &ChallengeKind) -> Result<Timed<String>, GatewayError> {
        match kind {
            ChallengeKind::BlockHash { height } => {
                let block = self.block_by_number(*height).await?;
                Ok(Timed::new(block.value.hash, block.latency_ms))
            }

            ChallengeKind::HeaderFields { height } => {
                let block = self.block_by_number(*height).await?;
                let answer = json!({
                    "hash": block.value.hash,
                    "parentHash": block.value.parent_hash,
                    "stateRoot": block.value.state_root,
                })
                .to_string();
                Ok(Timed::new(answer, block.latency_ms))
            }

            ChallengeKind::BalanceAtHeight { height, address } => {
                self.balance_at(address, *height).await
            }

            ChallengeKind::SyncStatus => {
                let status = self.sync_status().await?;
                let answer = json!({ "synced": status.value }).to_string();
                Ok(Timed::new(answer, status.latency_ms))
            }
        }
    }

    async fn block_number(&self) -> Result<Timed<u64>, GatewayError> {
        let result = self.call("eth_blockNumber", json!([])).await?;
        let raw = expect_string(&result)?;
        let height = parse_hex_u64(&raw)
            .ok_or_else(|| GatewayError::new(format!("bad quantity {raw:?}"), result.latency_ms))?;
        Ok(Timed::new(height, result.latency_ms))
    }

    async fn sync_status(&self) -> Result<Timed<bool>, GatewayError> {
        let result = self.call("eth_syncing", json!([])).await?;
        Ok(Timed::new(interpret_syncing(&result.value), result.latency_ms))
    }

    async fn peer_count(&self) -> Result<Timed<u64>, GatewayError> {
        let result = self.call("net_peerCount", json!([])).await?;
        let raw = expect_string(&result)?;
        let count = parse_hex_u64(&raw)
            .ok_or_else(|| GatewayError::new(format!("bad quantity {raw:?}"), result.latency_ms))?;
        Ok(Timed::new(count, result.latency_ms))
    }
}

/// Builds [`JsonRpcGateway`]s sharing one connection pool.
#[derive(Clone)]
pub struct JsonRpcConnector {
    client: Client,
}

impl JsonRpcConnector {
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(RPC_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl GatewayFactory for JsonRpcConnector {
    type Gateway = JsonRpcGateway;

    fn connect(&self, endpoint: &str, auth_token: Option<&str>) -> JsonRpcGateway {
        JsonRpcGateway {
            client: self.client.clone(),
            endpoint: endpoint.to_string(),
            auth_token: auth_token.map(str::to_string),
            request_id: AtomicU64::new(1),
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

fn hex_quantity(value: u64) -> String {
    format!("0x{value:x}")
}

fn parse_hex_u64(raw: &str) -> Option<u64> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    u64::from_str_radix(digits, 16).ok()
}

fn expect_string(result: &Timed<Value>) -> Result<String, GatewayError> {
    result
        .value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| GatewayError::new("expected string result", result.latency_ms))
}

/// `eth_syncing` returns `false` when the node is caught up and a progress
/// object while it is still syncing.
fn interpret_syncing(result: &Value) -> bool {
    matches!(result, Value::Bool(false))
}
