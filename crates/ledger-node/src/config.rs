//! Node configuration.

use crate::Args;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the store location.
pub const DATABASE_URL: &str = "DATABASE_URL";

/// Complete node configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node name.
    pub node_name: String,
    /// Store data directory.
    pub data_dir: Option<PathBuf>,
    /// API configuration.
    #[serde(default)]
    pub api: ApiConfig,
}

/// API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API bind address.
    pub bind_address: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: format!("0.0.0.0:{}", ledger_api::DEFAULT_API_PORT),
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_name: "ledger-indexer".to_string(),
            data_dir: None,
            api: ApiConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Load configuration from file, CLI args, and environment.
    ///
    /// Precedence for the store location: `--data-dir` flag, then the
    /// `DATABASE_URL` environment variable, then the config file. One of
    /// them must supply it.
    pub fn load(config_path: &Path, args: &Args) -> Result<Self> {
        let mut config = if config_path.exists() {
            let content =
                std::fs::read_to_string(config_path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            Self::default()
        };

        if let Some(ref data_dir) = args.data_dir {
            config.data_dir = Some(data_dir.clone());
        } else if let Ok(url) = std::env::var(DATABASE_URL) {
            if !url.is_empty() {
                config.data_dir = Some(PathBuf::from(url));
            }
        }

        if let Some(ref bind) = args.bind {
            config.api.bind_address = bind.clone();
        }

        if config.data_dir.is_none() {
            bail!(
                "No store location configured: set {} or pass --data-dir",
                DATABASE_URL
            );
        }

        Ok(config)
    }

    /// The configured store directory.
    pub fn store_path(&self) -> Result<&Path> {
        self.data_dir
            .as_deref()
            .context("No store location configured")
    }
}
