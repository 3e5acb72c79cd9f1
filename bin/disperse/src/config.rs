use alloy_primitives::Address;
use ::config::{NetworkConfig, NetworkConfigBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level disperse client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint url
    pub rpc_url: String,

    /// Disperse contract override (defaults to the network table entry)
    #[serde(default)]
    pub disperse_address: Option<Address>,

    /// Block explorer override (defaults to the network table entry)
    #[serde(default)]
    pub explorer_url: Option<String>,

    /// Account to read for when planning without a private key
    #[serde(default)]
    pub account: Option<Address>,

    /// Serve Prometheus metrics on this port
    #[serde(default)]
    pub metrics_port: Option<u16>,

    /// Plan only, never send transactions
    #[serde(default)]
    pub dry_run: bool,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Network parameters for the chain the RPC endpoint reports, with the
    /// overrides from this file applied.
    pub fn network_config(&self, chain_id: u64) -> eyre::Result<NetworkConfig> {
        let network = NetworkConfig::from_chain_id(chain_id)?.network;
        let mut builder = NetworkConfigBuilder::new(network);

        if let Some(disperse) = self.disperse_address {
            builder = builder.disperse(disperse);
        }
        if let Some(explorer_url) = &self.explorer_url {
            builder = builder.explorer_url(explorer_url.clone());
        }

        Ok(builder.build())
    }
}
