//! HTTP client for the wallet provider's JSON-RPC endpoint.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod rpc;

pub use rpc::RpcClient;

use reqwest::StatusCode;

use crate::objects::rpc::RpcErrorObject;

/// Errors produced by the SDK HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Provider unreachable or the connection dropped.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body or result could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider answered with a JSON-RPC error object.
    #[error("rpc error: {0}")]
    Rpc(RpcErrorObject),
}

impl ClientError {
    /// The JSON-RPC error object, if the provider sent one.
    pub fn rpc_error(&self) -> Option<&RpcErrorObject> {
        match self {
            ClientError::Rpc(error) => Some(error),
            _ => None,
        }
    }
}
