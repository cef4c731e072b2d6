//! Chain gateway.
//!
//! The gateway binds the vault contract to the account the wallet provider
//! authorized and exposes the two state-changing calls plus the balance
//! query. Submissions return as soon as the provider hands back a hash;
//! confirmation is a separate, possibly very long, wait.

mod disconnected;
mod rpc_gateway;

pub use disconnected::DisconnectedGateway;
pub use rpc_gateway::RpcChainGateway;

use async_trait::async_trait;
use depovault_sdk::client::ClientError;
use depovault_sdk::objects::contract::AbiError;
use depovault_sdk::objects::rpc::RpcErrorObject;
use depovault_sdk::objects::{AmountError, EtherAmount};
use thiserror::Error;

/// Errors that can occur while talking to the chain.
#[derive(Debug, Error)]
pub enum ChainError {
    /// No wallet provider endpoint is configured.
    #[error("no wallet provider available")]
    NoProvider,

    /// The provider has no authorized account to sign with.
    #[error("no authorized account available to sign")]
    NoSigner,

    /// The provider refused the request (user rejection, revert during
    /// estimation, invalid params).
    #[error("transaction rejected: {0}")]
    Rejected(RpcErrorObject),

    /// Transport or decoding failure talking to the provider.
    #[error("provider request failed: {0}")]
    Provider(ClientError),

    /// The contract answered with something that is not a valid value.
    #[error("unexpected contract response: {0}")]
    Decode(#[from] AbiError),

    /// Amount could not be converted to or from base units.
    #[error("invalid amount: {0}")]
    Amount(#[from] AmountError),
}

impl From<ClientError> for ChainError {
    fn from(value: ClientError) -> Self {
        match value {
            ClientError::Rpc(error) => ChainError::Rejected(error),
            other => ChainError::Provider(other),
        }
    }
}

/// The contract as seen by one signing account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultInterface {
    pub signer: String,
    pub contract: String,
}

/// Handle of a transaction the provider accepted for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedOperation {
    pub tx_hash: String,
}

/// Outcome of an included transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Reverted,
}

#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Bind the contract to the first authorized account.
    async fn authorized_interface(&self) -> Result<VaultInterface, ChainError>;

    /// Call `deposit()` with `amount` attached as value.
    async fn submit_deposit(&self, amount: EtherAmount) -> Result<SubmittedOperation, ChainError>;

    /// Call `withdraw(amount)`.
    async fn submit_withdraw(&self, amount: EtherAmount)
    -> Result<SubmittedOperation, ChainError>;

    /// `getBalance()` for the signing account.
    async fn query_balance(&self) -> Result<EtherAmount, ChainError>;

    /// Single receipt check; `None` while the transaction is not included.
    async fn confirmation_status(&self, tx_hash: &str)
    -> Result<Option<Confirmation>, ChainError>;

    /// Suspend until the transaction is included. There is no timeout.
    async fn wait_for_confirmation(
        &self,
        operation: &SubmittedOperation,
    ) -> Result<Confirmation, ChainError>;
}
