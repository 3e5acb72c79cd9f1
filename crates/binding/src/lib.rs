//! Contract bindings for all external contracts.
//!
//! This crate consolidates the Solidity interfaces the disperse client talks to:
//! - ERC20 tokens (allowance, decimals, approve)
//! - The Disperse contract (one-transaction multi-recipient transfer)
//!
//! All bindings are generated using alloy's `sol!` macro.

pub mod disperse;
pub mod token;
