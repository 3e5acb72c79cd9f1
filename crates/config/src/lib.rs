//! Configuration types for the disperse client.
//!
//! This crate provides:
//! - The static per-network table (disperse contract, block explorer)
//! - Lookup by chain id and overrides for custom deployments

pub mod network;

pub use network::{ConfigError, Network, NetworkConfig, NetworkConfigBuilder};
