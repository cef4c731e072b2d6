//! Runtime configuration types.
//!
//! These types represent the validated configuration the core components
//! are built from. Loading and parsing the config file is handled by the
//! CLI crate.

use std::time::Duration;
use url::Url;

/// Default delay between receipt polls while awaiting confirmation.
pub const DEFAULT_CONFIRMATION_POLL: Duration = Duration::from_secs(2);

/// Default delay between pending-record sweeps.
pub const DEFAULT_RECONCILE_INTERVAL: Duration = Duration::from_secs(30);

/// Chain and wallet provider settings.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// JSON-RPC endpoint of the wallet provider. `None` means no provider
    /// is available, the same as a browser without an injected wallet.
    pub rpc_url: Option<Url>,
    /// Address of the vault contract.
    pub contract_address: String,
    /// Delay between receipt polls. Must be non-zero.
    pub confirmation_poll_interval: Duration,
    /// Per-request timeout for provider calls.
    pub http_timeout: Duration,
}

/// Ledger store settings. The connection URL comes from `DATABASE_URL`.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub max_connections: u32,
}

/// Pending record sweeper settings.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Delay between sweeps. Must be non-zero.
    pub interval: Duration,
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub chain: ChainConfig,
    pub store: StoreConfig,
    pub reconciler: ReconcilerConfig,
}
