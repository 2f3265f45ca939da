//! EIP-1193 wallet provider over HTTP JSON-RPC.
//!
//! [`JsonRpcWallet`] speaks the same request vocabulary a browser wallet
//! exposes to a page (`eth_requestAccounts`, `wallet_switchEthereumChain`,
//! `eth_sendTransaction`, ...), so any endpoint that bridges to a wallet or an
//! unlocked development node can back the flows.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::{Address, B256, Bytes};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::{WalletError, WalletProvider};
use crate::chain::{
    ChainId, DEFAULT_RECEIPT_POLL_INTERVAL, MIN_RECEIPT_POLL_INTERVAL, TransactionReceipt,
    TransactionRequest,
};

/// Wallet provider backed by a JSON-RPC endpoint.
///
/// # Example
///
/// ```ignore
/// use lockb0x_key::wallet::JsonRpcWallet;
///
/// let wallet = JsonRpcWallet::new("http://127.0.0.1:8545");
/// ```
pub struct JsonRpcWallet {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
    poll_interval: Duration,
}

impl JsonRpcWallet {
    /// Creates a wallet client for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Creates a wallet client reusing an existing HTTP client.
    pub fn with_client(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
            poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
        }
    }

    /// Sets the interval between receipt polls, clamped to
    /// [`MIN_RECEIPT_POLL_INTERVAL`].
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(MIN_RECEIPT_POLL_INTERVAL);
        self
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one JSON-RPC request and decodes its `result`.
    pub async fn request<T>(&self, method: &str, params: Value) -> Result<T, WalletError>
    where
        T: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!(id, method, "wallet request");

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WalletError::Connection(e.to_string()))?;

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|e| WalletError::InvalidResponse(format!("{method}: {e}")))?;

        if let Some(error) = envelope.error {
            tracing::debug!(id, method, code = error.code, "wallet returned error");
            return Err(WalletError::from_rpc(error.code, error.message));
        }

        let result = envelope.result.unwrap_or(Value::Null);
        serde_json::from_value(result)
            .map_err(|e| WalletError::InvalidResponse(format!("{method}: {e}")))
    }
}

impl std::fmt::Debug for JsonRpcWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcWallet")
            .field("url", &self.url)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    async fn request_accounts(&self) -> Result<Address, WalletError> {
        let accounts: Vec<Address> = self.request("eth_requestAccounts", json!([])).await?;
        accounts.into_iter().next().ok_or(WalletError::NoAccounts)
    }

    async fn chain_id(&self) -> Result<ChainId, WalletError> {
        self.request("eth_chainId", json!([])).await
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), WalletError> {
        let _: Value = self
            .request(
                "wallet_switchEthereumChain",
                json!([{ "chainId": chain_id.to_hex() }]),
            )
            .await?;
        Ok(())
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, WalletError> {
        self.request("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<B256, WalletError> {
        self.request("eth_sendTransaction", json!([request])).await
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt, WalletError> {
        loop {
            let receipt: Option<TransactionReceipt> = self
                .request("eth_getTransactionReceipt", json!([hash]))
                .await?;
            if let Some(receipt) = receipt {
                return Ok(receipt);
            }
            tracing::trace!(tx_hash = %hash, "receipt not available yet");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
