//! Endpoint and client configuration.
//!
//! Defaults point at the public Solana clusters. `Config::from_env` reads an
//! optional `.env` file and then the process environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sol_rpc::Commitment;
use url::Url;

use crate::endpoint::Cluster;
use crate::error::PanelError;

pub const DEFAULT_DEVNET_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_MAINNET_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
/// Maximum number of history records fetched per refresh.
pub const HISTORY_FETCH_LIMIT: usize = 100;
/// Largest faucet request, in SOL.
pub const AIRDROP_MAX_SOL: f64 = 2.0;
pub const DEFAULT_TRANSFER_SOL: f64 = 1.0;

const ENV_DEVNET_URL: &str = "SOL_DEVNET_URL";
const ENV_MAINNET_URL: &str = "SOL_MAINNET_URL";
const ENV_COMMITMENT: &str = "SOL_COMMITMENT";
const ENV_TIMEOUT: &str = "SOL_RPC_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub devnet_url: String,
    pub mainnet_url: String,
    pub commitment: Commitment,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            devnet_url: DEFAULT_DEVNET_URL.into(),
            mainnet_url: DEFAULT_MAINNET_URL.into(),
            commitment: Commitment::Confirmed,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load `.env` if present, then apply `SOL_*` overrides.
    pub fn from_env() -> Result<Self, PanelError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Keys that are absent
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PanelError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_DEVNET_URL) {
            config.devnet_url = url.trim().to_string();
        }
        if let Some(url) = lookup(ENV_MAINNET_URL) {
            config.mainnet_url = url.trim().to_string();
        }
        if let Some(level) = lookup(ENV_COMMITMENT) {
            config.commitment = level
                .parse()
                .map_err(|e| PanelError::Config(format!("{ENV_COMMITMENT}: {e}")))?;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT) {
            config.request_timeout_secs = secs
                .trim()
                .parse()
                .map_err(|e| PanelError::Config(format!("{ENV_TIMEOUT}: {e}")))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PanelError> {
        check_url("devnet_url", &self.devnet_url)?;
        check_url("mainnet_url", &self.mainnet_url)?;
        if self.request_timeout_secs == 0 {
            return Err(PanelError::Config(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Endpoint URL for `cluster`.
    pub fn url_for(&self, cluster: Cluster) -> &str {
        match cluster {
            Cluster::Devnet => &self.devnet_url,
            Cluster::Mainnet => &self.mainnet_url,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn check_url(field: &str, value: &str) -> Result<(), PanelError> {
    let url = Url::parse(value).map_err(|e| PanelError::Config(format!("{field}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(PanelError::Config(format!(
            "{field}: unsupported scheme {other}"
        ))),
    }
}
