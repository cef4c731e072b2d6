//! Wallet provider seam and the session manager built on it.

mod session;

pub use session::WalletSessionManager;

use async_trait::async_trait;
use depovault_sdk::client::{ClientError, RpcClient};

/// Account authorization surface of a wallet provider.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts the user already authorized, without prompting.
    async fn accounts(&self) -> Result<Vec<String>, ClientError>;

    /// Prompt the user to authorize an account.
    async fn request_accounts(&self) -> Result<Vec<String>, ClientError>;
}

#[async_trait]
impl WalletProvider for RpcClient {
    async fn accounts(&self) -> Result<Vec<String>, ClientError> {
        RpcClient::accounts(self).await
    }

    async fn request_accounts(&self) -> Result<Vec<String>, ClientError> {
        RpcClient::request_accounts(self).await
    }
}
