use super::WalletProvider;
use crate::error::FlowError;
use crate::processors::HistoryLoader;
use crate::state::AppStateStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tracks which account the user is connected with.
///
/// The session is set by probing on startup or by an explicit connect and
/// is never cleared here; an external disconnect is not observed.
pub struct WalletSessionManager {
    provider: Option<Arc<dyn WalletProvider>>,
    state: AppStateStore,
    history: HistoryLoader,
}

impl WalletSessionManager {
    /// `provider` is `None` when no wallet provider is available.
    pub fn new(
        provider: Option<Arc<dyn WalletProvider>>,
        state: AppStateStore,
        history: HistoryLoader,
    ) -> Self {
        Self {
            provider,
            state,
            history,
        }
    }

    /// Adopt an account the provider already authorized, if any.
    ///
    /// Never fails: a missing provider or a provider error just leaves the
    /// session empty.
    pub async fn probe_existing_session(&self) -> Option<String> {
        let Some(provider) = &self.provider else {
            debug!("No wallet provider configured, skipping session probe");
            return None;
        };

        let accounts = match provider.accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!(error = %e, "Failed to query authorized accounts");
                return None;
            }
        };

        let address = accounts.into_iter().next()?;
        info!(wallet = %address, "Restored existing wallet session");
        self.adopt(address.clone()).await;
        Some(address)
    }

    /// Ask the provider to authorize an account and adopt it.
    pub async fn request_connection(&self) -> Result<String, FlowError> {
        let result = self.connect().await;
        match &result {
            Ok(_) => self.state.show_success("Wallet connected"),
            Err(e) => self.state.show_error(e.to_string()),
        }
        result
    }

    async fn connect(&self) -> Result<String, FlowError> {
        let Some(provider) = &self.provider else {
            return Err(FlowError::WalletUnavailable);
        };

        let accounts = provider.request_accounts().await.map_err(|e| {
            match e.rpc_error() {
                Some(rpc) if rpc.is_user_rejection() => {
                    info!("User rejected the connection request");
                }
                _ => warn!(error = %e, "Wallet connection request failed"),
            }
            FlowError::ConnectionRejected
        })?;

        let Some(address) = accounts.into_iter().next() else {
            warn!("Wallet provider granted no accounts");
            return Err(FlowError::ConnectionRejected);
        };

        info!(wallet = %address, "Wallet connected");
        self.adopt(address.clone()).await;
        Ok(address)
    }

    async fn adopt(&self, address: String) {
        self.state.set_wallet(address.clone());
        self.history.load(&address).await;
    }
}
