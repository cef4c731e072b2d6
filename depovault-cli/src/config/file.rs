//! TOML file configuration structures.
//!
//! These structs directly map to the `depovault.toml` file format.

use depovault_core::config::{DEFAULT_CONFIRMATION_POLL, DEFAULT_RECONCILE_INTERVAL};
use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub chain: ChainConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
}

/// Chain and wallet provider section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint of the wallet provider. Leave unset when no
    /// provider is available.
    #[serde(default)]
    pub rpc_url: Option<Url>,
    /// Address of the vault contract.
    pub contract_address: String,
    /// Milliseconds between receipt polls while awaiting confirmation.
    #[serde(default = "default_confirmation_poll_ms")]
    pub confirmation_poll_ms: u64,
    /// Timeout for each provider request, in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

/// Ledger store section. The connection string is read from `DATABASE_URL`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
        }
    }
}

/// Pending record sweeper section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Seconds between sweeps in `reconcile --watch`.
    #[serde(default = "default_reconcile_interval_secs")]
    pub interval_secs: u64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_reconcile_interval_secs(),
        }
    }
}

fn default_confirmation_poll_ms() -> u64 {
    DEFAULT_CONFIRMATION_POLL.as_millis() as u64
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    5
}

fn default_reconcile_interval_secs() -> u64 {
    DEFAULT_RECONCILE_INTERVAL.as_secs()
}
