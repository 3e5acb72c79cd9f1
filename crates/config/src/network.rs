//! Network configuration for the disperse client.
//!
//! Each supported chain has exactly one disperse contract deployment and one
//! block explorer. The active network is picked by the chain id the RPC
//! endpoint reports.

use alloy_primitives::{address, Address, TxHash};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No disperse deployment is known for this chain id
    #[error("Unsupported network: chain id {0}")]
    UnsupportedNetwork(u64),
}

/// Networks with a known disperse deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    TaikoMainnet,
    TaikoHekla,
}

impl Network {
    /// Every supported network, in display order.
    pub const ALL: [Self; 2] = [Self::TaikoMainnet, Self::TaikoHekla];

    /// Chain id the RPC endpoint reports for this network.
    pub const fn chain_id(self) -> u64 {
        match self {
            Self::TaikoMainnet => 167000,
            Self::TaikoHekla => 167009,
        }
    }

    /// Find the network for a chain id.
    pub fn from_chain_id(chain_id: u64) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|network| network.chain_id() == chain_id)
            .ok_or(ConfigError::UnsupportedNetwork(chain_id))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TaikoMainnet => write!(f, "Taiko Mainnet"),
            Self::TaikoHekla => write!(f, "Taiko Hekla"),
        }
    }
}

/// Per-network parameters of the disperse client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Which network this is
    pub network: Network,
    /// Chain ID
    pub chain_id: u64,
    /// Disperse contract address
    pub disperse: Address,
    /// Block explorer base url, with trailing slash
    pub explorer_url: String,
}

impl NetworkConfig {
    /// Taiko mainnet configuration.
    pub fn taiko_mainnet() -> Self {
        Self {
            network: Network::TaikoMainnet,
            chain_id: Network::TaikoMainnet.chain_id(),
            // https://taikoscan.io/address/0x8e4dec5993D81D3bF3a4972b734D5EdF4Bdb1dB8
            disperse: address!("0x8e4dec5993D81D3bF3a4972b734D5EdF4Bdb1dB8"),
            explorer_url: "https://taikoscan.io/".to_string(),
        }
    }

    /// Taiko Hekla testnet configuration.
    pub fn taiko_hekla() -> Self {
        Self {
            network: Network::TaikoHekla,
            chain_id: Network::TaikoHekla.chain_id(),
            // https://hekla.taikoscan.io/address/0x82D8824255aC1030E5F01Ad7984B505Ad9De0C2D
            disperse: address!("0x82D8824255aC1030E5F01Ad7984B505Ad9De0C2D"),
            explorer_url: "https://hekla.taikoscan.io/".to_string(),
        }
    }

    /// Create configuration from network.
    pub fn from_network(network: Network) -> Self {
        match network {
            Network::TaikoMainnet => Self::taiko_mainnet(),
            Network::TaikoHekla => Self::taiko_hekla(),
        }
    }

    /// Look up the configuration for the chain id reported by the RPC endpoint.
    pub fn from_chain_id(chain_id: u64) -> Result<Self, ConfigError> {
        Network::from_chain_id(chain_id).map(Self::from_network)
    }

    /// Explorer link for a transaction.
    pub fn tx_url(&self, tx_hash: &TxHash) -> String {
        format!("{}tx/{}", self.explorer_url, tx_hash)
    }

    /// Explorer link for an account or contract.
    pub fn address_url(&self, address: &Address) -> String {
        format!("{}address/{}", self.explorer_url, address)
    }
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    config: NetworkConfig,
}

impl NetworkConfigBuilder {
    /// Start from the defaults of a known network.
    pub fn new(network: Network) -> Self {
        Self {
            config: NetworkConfig::from_network(network),
        }
    }

    /// Override the disperse contract address.
    pub const fn disperse(mut self, address: Address) -> Self {
        self.config.disperse = address;
        self
    }

    /// Override the block explorer base url.
    ///
    /// A trailing slash is appended when missing so links stay well-formed.
    pub fn explorer_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.config.explorer_url = url;
        self
    }

    /// Build the network configuration.
    pub fn build(self) -> NetworkConfig {
        self.config
    }
}
