//! Component wiring shared by every subcommand.

use depovault_core::chain::{ChainGateway, DisconnectedGateway, RpcChainGateway};
use depovault_core::config::AppConfig;
use depovault_core::framework::DatabaseProcessor;
use depovault_core::processors::{PendingReconciler, TransactionOrchestrator};
use depovault_core::state::AppStateStore;
use depovault_core::store::LedgerStore;
use depovault_core::wallet::{WalletProvider, WalletSessionManager};
use depovault_sdk::client::RpcClient;
use sqlx::PgPool;
use std::sync::Arc;

/// Everything a subcommand needs, built once from the loaded configuration.
pub struct App {
    pub state: AppStateStore,
    pub session: WalletSessionManager,
    pub orchestrator: TransactionOrchestrator,
    pub reconciler: PendingReconciler,
}

impl App {
    pub fn new(config: &AppConfig, db: PgPool) -> Self {
        let state = AppStateStore::new();
        let store: Arc<dyn LedgerStore> = Arc::new(DatabaseProcessor::new(db));

        let (provider, gateway): (Option<Arc<dyn WalletProvider>>, Arc<dyn ChainGateway>) =
            match &config.chain.rpc_url {
                Some(rpc_url) => {
                    let http = reqwest::Client::builder()
                        .timeout(config.chain.http_timeout)
                        .build()
                        .unwrap_or_else(|e| {
                            tracing::warn!(error = %e, "Falling back to default HTTP client");
                            reqwest::Client::new()
                        });
                    let client = Arc::new(RpcClient::new(rpc_url.clone()).with_http_client(http));
                    tracing::info!(endpoint = %client.endpoint(), "Using wallet provider");
                    let provider: Arc<dyn WalletProvider> = client.clone();
                    let gateway: Arc<dyn ChainGateway> =
                        Arc::new(RpcChainGateway::new(client, &config.chain));
                    (Some(provider), gateway)
                }
                None => {
                    tracing::warn!("No wallet provider configured; chain actions are unavailable");
                    let gateway: Arc<dyn ChainGateway> = Arc::new(DisconnectedGateway);
                    (None, gateway)
                }
            };

        let orchestrator =
            TransactionOrchestrator::new(Arc::clone(&gateway), Arc::clone(&store), state.clone());
        let session =
            WalletSessionManager::new(provider, state.clone(), orchestrator.history_loader());
        let reconciler =
            PendingReconciler::new(gateway, store, state.clone(), config.reconciler.interval);

        Self {
            state,
            session,
            orchestrator,
            reconciler,
        }
    }
}
