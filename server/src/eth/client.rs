//! JSON-RPC access to an Ethereum node with node-managed accounts

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::{debug, instrument};

use super::types::{
    h256_hex, parse_address, parse_bytes, parse_h256, parse_quantity, Address, CallRequest, Log,
    LogFilter, TxReceipt,
};
use crate::error::GatewayError;

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// The chain operations the gateway relies on
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn accounts(&self) -> Result<Vec<Address>, GatewayError>;

    async fn block_number(&self) -> Result<u64, GatewayError>;

    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, GatewayError>;

    /// Submits a transaction and waits until it is mined. A mined but failed
    /// transaction is reported as [`GatewayError::Reverted`].
    async fn send_transaction(&self, request: &CallRequest) -> Result<TxReceipt, GatewayError>;

    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<Log>, GatewayError>;
}

/// [`ChainClient`] over HTTP JSON-RPC
pub struct HttpChainClient {
    rpc_url: String,
    http: Client,
    receipt_timeout: Duration,
    next_id: AtomicU64,
}

impl HttpChainClient {
    pub fn new(rpc_url: String, receipt_timeout: Duration) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            rpc_url,
            http,
            receipt_timeout,
            next_id: AtomicU64::new(1),
        })
    }

    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, GatewayError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let response = self
            .http
            .post(&self.rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": method,
                "params": params,
            }))
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        if let Some(error) = response.get("error") {
            let code = error.pointer("/code").and_then(Value::as_i64).unwrap_or(0);
            let message = error
                .pointer("/message")
                .and_then(Value::as_str)
                .unwrap_or("unknown rpc error");
            return Err(GatewayError::from_rpc(code, message));
        }

        response
            .get("result")
            .cloned()
            .ok_or_else(|| GatewayError::Decode(format!("{method}: no result in RPC response")))
    }

    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<TxReceipt, GatewayError> {
        let started = Instant::now();

        loop {
            let raw = self
                .rpc_call("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;

            if !raw.is_null() {
                return parse_receipt(&raw);
            }

            if started.elapsed() >= self.receipt_timeout {
                return Err(GatewayError::Network(format!(
                    "no receipt for {tx_hash} after {}s",
                    self.receipt_timeout.as_secs()
                )));
            }

            sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl ChainClient for HttpChainClient {
    async fn accounts(&self) -> Result<Vec<Address>, GatewayError> {
        let raw = self.rpc_call("eth_accounts", json!([])).await?;
        raw.as_array()
            .ok_or_else(|| GatewayError::Decode("eth_accounts: expected an array".into()))?
            .iter()
            .map(|entry| {
                entry
                    .as_str()
                    .and_then(parse_address)
                    .ok_or_else(|| GatewayError::Decode(format!("eth_accounts: bad entry {entry}")))
            })
            .collect()
    }

    async fn block_number(&self) -> Result<u64, GatewayError> {
        let raw = self.rpc_call("eth_blockNumber", json!([])).await?;
        raw.as_str()
            .and_then(parse_quantity)
            .ok_or_else(|| GatewayError::Decode(format!("eth_blockNumber: bad quantity {raw}")))
    }

    #[instrument(skip(self, request), fields(to = ?request.to), level = "debug")]
    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, GatewayError> {
        let raw = self
            .rpc_call("eth_call", json!([request.to_json(), "latest"]))
            .await?;
        raw.as_str()
            .and_then(parse_bytes)
            .ok_or_else(|| GatewayError::Decode(format!("eth_call: bad return data {raw}")))
    }

    #[instrument(skip(self, request), fields(from = ?request.from), level = "debug")]
    async fn send_transaction(&self, request: &CallRequest) -> Result<TxReceipt, GatewayError> {
        let raw = self
            .rpc_call("eth_sendTransaction", json!([request.to_json()]))
            .await?;
        let tx_hash = raw
            .as_str()
            .ok_or_else(|| GatewayError::Decode(format!("eth_sendTransaction: bad hash {raw}")))?
            .to_string();

        debug!(tx_hash = %tx_hash, "transaction submitted");

        let receipt = self.wait_for_receipt(&tx_hash).await?;
        if !receipt.success {
            return Err(GatewayError::Reverted(format!(
                "transaction {} failed in block {}",
                h256_hex(&receipt.transaction_hash),
                receipt.block_number
            )));
        }
        Ok(receipt)
    }

    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<Log>, GatewayError> {
        let raw = self.rpc_call("eth_getLogs", json!([filter.to_json()])).await?;
        let entries = raw
            .as_array()
            .ok_or_else(|| GatewayError::Decode("eth_getLogs: expected an array".into()))?;

        Ok(entries.iter().filter_map(parse_log).collect())
    }
}

fn parse_receipt(raw: &Value) -> Result<TxReceipt, GatewayError> {
    let transaction_hash = raw
        .pointer("/transactionHash")
        .and_then(Value::as_str)
        .and_then(parse_h256)
        .ok_or_else(|| GatewayError::Decode("receipt without transactionHash".into()))?;

    let block_number = raw
        .pointer("/blockNumber")
        .and_then(Value::as_str)
        .and_then(parse_quantity)
        .unwrap_or(0);

    // Pre-byzantium nodes omit `status`; treat the transaction as successful.
    let success = raw
        .pointer("/status")
        .and_then(Value::as_str)
        .and_then(parse_quantity)
        .map(|status| status == 1)
        .unwrap_or(true);

    Ok(TxReceipt {
        transaction_hash,
        block_number,
        success,
    })
}

fn parse_log(raw: &Value) -> Option<Log> {
    if raw.pointer("/removed").and_then(Value::as_bool) == Some(true) {
        return None;
    }

    let address = raw.pointer("/address").and_then(Value::as_str).and_then(parse_address)?;

    let topics = raw
        .pointer("/topics")
        .and_then(Value::as_array)?
        .iter()
        .filter_map(|topic| topic.as_str().and_then(parse_h256))
        .collect();

    let data = raw
        .pointer("/data")
        .and_then(Value::as_str)
        .and_then(parse_bytes)
        .unwrap_or_default();

    let block_number = raw
        .pointer("/blockNumber")
        .and_then(Value::as_str)
        .and_then(parse_quantity)
        .unwrap_or(0);

    let transaction_hash = raw
        .pointer("/transactionHash")
        .and_then(Value::as_str)
        .and_then(parse_h256);

    let log_index = raw
        .pointer("/logIndex")
        .and_then(Value::as_str)
        .and_then(parse_quantity)
        .unwrap_or(0);

    Some(Log {
        address,
        topics,
        data,
        block_number,
        transaction_hash,
        log_index,
    })
}
