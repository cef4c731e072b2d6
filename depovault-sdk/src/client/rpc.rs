//! JSON-RPC client (vault front-end → wallet provider).
//!
//! The provider is whatever holds the user's keys and speaks the standard
//! Ethereum JSON-RPC surface: a local node with unlocked accounts or a
//! wallet bridge. Signing happens on the provider side.

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::ClientError;
use crate::objects::rpc::{
    CallRequest, RpcRequest, RpcResponse, TransactionReceipt, TransactionRequest,
};

/// Typed JSON-RPC client for a wallet provider endpoint.
#[derive(Debug)]
pub struct RpcClient {
    http: Client,
    endpoint: Url,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a new `RpcClient` for the given provider endpoint.
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            next_id: AtomicU64::new(1),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send a raw JSON-RPC request and decode its result.
    pub async fn request<P, T>(&self, method: &str, params: P) -> Result<T, ClientError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest::new(id, method, params);

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, body });
        }

        let bytes = resp.bytes().await?;
        let response: RpcResponse = serde_json::from_slice(&bytes)?;
        if let Some(error) = response.error {
            return Err(ClientError::Rpc(error));
        }
        let result = response.result.unwrap_or(serde_json::Value::Null);
        serde_json::from_value(result).map_err(ClientError::Json)
    }

    /// `eth_accounts` – accounts already authorized for this origin.
    pub async fn accounts(&self) -> Result<Vec<String>, ClientError> {
        self.request("eth_accounts", [(); 0]).await
    }

    /// `eth_requestAccounts` – prompt the user to authorize accounts.
    pub async fn request_accounts(&self) -> Result<Vec<String>, ClientError> {
        self.request("eth_requestAccounts", [(); 0]).await
    }

    /// `eth_sendTransaction` – sign and broadcast, returning the hash.
    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String, ClientError> {
        self.request("eth_sendTransaction", [tx]).await
    }

    /// `eth_call` against the latest block.
    pub async fn call(&self, call: &CallRequest) -> Result<String, ClientError> {
        self.request("eth_call", (call, "latest")).await
    }

    /// `eth_getTransactionReceipt` – `None` while the transaction is not
    /// yet included.
    pub async fn transaction_receipt(
        &self,
        tx_hash: &str,
    ) -> Result<Option<TransactionReceipt>, ClientError> {
        self.request("eth_getTransactionReceipt", [tx_hash]).await
    }
}
