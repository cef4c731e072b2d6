//! Configuration module for depovault-cli.
//!
//! Handles loading configuration from the TOML file, CLI overrides and
//! environment variables, and turns it into the core runtime types.

pub mod file;

use depovault_core::config::{AppConfig, ChainConfig, ReconcilerConfig, StoreConfig};
use file::FileConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    rpc_url_override: Option<Url>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, rpc_url_override: Option<Url>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            rpc_url_override,
        }
    }

    /// Read, override, validate and convert the configuration file.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let content = std::fs::read_to_string(&self.config_path)?;
        self.parse(&content)
    }

    fn parse(&self, content: &str) -> Result<AppConfig, ConfigError> {
        let mut file_config: FileConfig = toml::from_str(content)?;

        if let Some(rpc_url) = &self.rpc_url_override {
            file_config.chain.rpc_url = Some(rpc_url.clone());
        }

        validate(&file_config)?;
        Ok(build_app_config(file_config))
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    if !is_hex_address(&config.chain.contract_address) {
        return Err(ConfigError::ValidationError(format!(
            "contract_address {:?} is not a 0x-prefixed 20-byte hex address",
            config.chain.contract_address
        )));
    }
    if config.chain.confirmation_poll_ms == 0 {
        return Err(ConfigError::ValidationError(
            "chain.confirmation_poll_ms must be greater than zero".to_string(),
        ));
    }
    if config.store.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "store.max_connections must be greater than zero".to_string(),
        ));
    }
    if config.reconciler.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "reconciler.interval_secs must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn is_hex_address(address: &str) -> bool {
    address
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

fn build_app_config(file_config: FileConfig) -> AppConfig {
    AppConfig {
        chain: ChainConfig {
            rpc_url: file_config.chain.rpc_url,
            contract_address: file_config.chain.contract_address,
            confirmation_poll_interval: Duration::from_millis(
                file_config.chain.confirmation_poll_ms,
            ),
            http_timeout: Duration::from_secs(file_config.chain.http_timeout_secs),
        },
        store: StoreConfig {
            max_connections: file_config.store.max_connections,
        },
        reconciler: ReconcilerConfig {
            interval: Duration::from_secs(file_config.reconciler.interval_secs),
        },
    }
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    #[test]
    fn test_rpc_url_override() {
        let loader = ConfigLoader::new(
            "unused.toml",
            Some(Url::parse("http://localhost:9545").unwrap()),
        );
        let config = loader
            .parse(&format!("[chain]\ncontract_address = \"{CONTRACT}\"\n"))
            .unwrap();
        assert_eq!(
            config.chain.rpc_url.as_ref().map(Url::as_str),
            Some("http://localhost:9545/")
        );
        assert_eq!(
            config.chain.confirmation_poll_interval,
            Duration::from_secs(2)
        );
    }

    #[test]
    fn test_rejects_bad_contract_address() {
        let loader = ConfigLoader::new("unused.toml", None);
        let result = loader.parse("[chain]\ncontract_address = \"vault\"\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_zero_poll_interval() {
        let loader = ConfigLoader::new("unused.toml", None);
        let result = loader.parse(&format!(
            "[chain]\ncontract_address = \"{CONTRACT}\"\nconfirmation_poll_ms = 0\n"
        ));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
