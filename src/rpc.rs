use crate::models::{CallResult, ReferenceBundle};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Vec<Value>,
    id: u64,
}

impl JsonRpcRequest {
    fn new(method: &str, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Deserialize)]
struct JsonRpcError {
    #[allow(dead_code)]
    code: Option<i64>,
    message: String,
}

/// Raw response as seen by the transport, with the elapsed wall-clock time
/// from just before the request was issued to just after the body was
/// fully received.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
    pub elapsed_ms: f64,
}

/// Network-level failure (DNS, connection refused, timeout). Carries the
/// elapsed time up to the point the failure was detected.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub elapsed_ms: f64,
}

/// The network seam. The production implementation posts over reqwest and
/// owns the timing clock; tests substitute a scripted fake.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, body: String) -> Result<TransportResponse, TransportError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(request_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::ClientBuilder::new()
            .pool_idle_timeout(Duration::from_secs(300))
            .pool_max_idle_per_host(20)
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .tcp_keepalive(Duration::from_secs(30))
            .user_agent("rpc-benchmark/0.1")
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<TransportResponse, TransportError> {
        let start = Instant::now();
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError {
                message: e.to_string(),
                elapsed_ms: elapsed_ms(start),
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| TransportError {
            message: e.to_string(),
            elapsed_ms: elapsed_ms(start),
        })?;

        Ok(TransportResponse {
            status,
            body,
            elapsed_ms: elapsed_ms(start),
        })
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// How a single call went wrong. Every variant is recovered locally and
/// surfaced as a failed `CallResult`, never propagated.
#[derive(Debug, Error)]
enum RpcFailure {
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Protocol(String),
    #[error("{0}")]
    Decode(String),
}

/// A reference-discovery call failed, so the endpoint's whole pass is
/// reported as failed with this message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ResolutionError {
    pub message: String,
}

pub struct RpcClient<T: Transport> {
    transport: T,
}

impl<T: Transport> RpcClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Issues one timed JSON-RPC 2.0 call. All failure paths come back as
    /// a failed `CallResult` with the cause and elapsed time in the
    /// message; nothing escapes as an error. Exactly one request is sent,
    /// with no retries.
    pub async fn call(&self, url: &str, method: &str, params: Vec<Value>) -> CallResult {
        let (time, outcome) = self.execute(url, method, params).await;
        match outcome {
            Ok(result) => CallResult::ok(method, time, result),
            Err(failure) => {
                CallResult::failed(method, time, format!("{} ({:.2} ms)", failure, time))
            }
        }
    }

    async fn execute(
        &self,
        url: &str,
        method: &str,
        params: Vec<Value>,
    ) -> (f64, Result<Option<Value>, RpcFailure>) {
        let request = JsonRpcRequest::new(method, params);
        let body = match serde_json::to_string(&request) {
            Ok(body) => body,
            Err(e) => return (0.0, Err(RpcFailure::Decode(e.to_string()))),
        };

        let response = match self.transport.post_json(url, body).await {
            Ok(response) => response,
            Err(e) => return (e.elapsed_ms, Err(RpcFailure::Transport(e.message))),
        };

        let time = response.elapsed_ms;
        let decoded: Result<JsonRpcResponse, _> = serde_json::from_str(&response.body);

        if !(200..300).contains(&response.status) {
            // Prefer the JSON-RPC error message when the error body carries one.
            let cause = decoded
                .ok()
                .and_then(|d| d.error)
                .map(|e| e.message)
                .unwrap_or_else(|| format!("HTTP error! status: {}", response.status));
            return (time, Err(RpcFailure::Protocol(cause)));
        }

        let decoded = match decoded {
            Ok(decoded) => decoded,
            Err(e) => return (time, Err(RpcFailure::Decode(e.to_string()))),
        };

        if let Some(error) = decoded.error {
            return (time, Err(RpcFailure::Protocol(error.message)));
        }

        (time, Ok(decoded.result))
    }
}

/// Fetches the reference values a benchmark pass needs: the latest block
/// number, that block's hash, and the hash of its first transaction.
/// Strictly sequential; each step depends on the previous one.
pub async fn resolve_references<T: Transport>(
    client: &RpcClient<T>,
    url: &str,
) -> Result<ReferenceBundle, ResolutionError> {
    let block_number = client.call(url, "eth_blockNumber", vec![]).await;
    if block_number.error {
        return Err(ResolutionError {
            message: block_number.error_message,
        });
    }
    let latest_block_number = block_number.result.unwrap_or(Value::Null);

    let block = client
        .call(
            url,
            "eth_getBlockByNumber",
            vec![latest_block_number.clone(), Value::Bool(true)],
        )
        .await;
    if block.error {
        return Err(ResolutionError {
            message: block.error_message,
        });
    }

    let block = block.result.unwrap_or(Value::Null);
    let latest_block_hash = block
        .get("hash")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ResolutionError {
            message: "block response missing hash field".to_string(),
        })?;

    // An empty latest block is a structural condition, not a failure.
    let latest_transaction_hash = block
        .get("transactions")
        .and_then(Value::as_array)
        .and_then(|txs| txs.first())
        .and_then(|tx| tx.get("hash"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ReferenceBundle {
        latest_block_number,
        latest_block_hash,
        latest_transaction_hash,
    })
}
