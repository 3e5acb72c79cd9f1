//! Token dispersal workflow.
//!
//! [`DisperseWorkflow`] drives one submission from raw user input to a
//! confirmed on-chain transaction:
//! read allowance and decimals, build the [`batch::TransferBatch`], approve the
//! missing allowance when needed, then call the disperse contract.
//!
//! All chain access goes through the [`Wallet`] trait so the workflow can run
//! against any alloy provider ([`ProviderWallet`]) or an in-memory double.

pub mod disperse;
pub mod error;
pub mod provider;
pub mod state;

use alloy_primitives::{Address, Bytes, TxHash};
use alloy_rpc_types::TransactionRequest;
use serde::{Deserialize, Serialize};
use std::future::Future;

pub use disperse::{DisperseOutcome, DispersePlan, DisperseRequest, DisperseWorkflow, TokenMetadata};
pub use error::{DisperseError, ErrorKind};
pub use provider::ProviderWallet;
pub use state::{Stage, WorkflowState};

/// Wallet and RPC access needed by the workflow.
pub trait Wallet: Send + Sync {
    /// The connected account, if any.
    fn account(&self) -> Option<Address>;

    /// Execute a read-only contract call.
    fn call(&self, tx: TransactionRequest) -> impl Future<Output = eyre::Result<Bytes>> + Send;

    /// Dry-run a state-changing call from the connected account.
    ///
    /// Fails if the transaction would revert.
    fn simulate(&self, tx: TransactionRequest)
        -> impl Future<Output = eyre::Result<Bytes>> + Send;

    /// Sign and broadcast a transaction.
    fn send(&self, tx: TransactionRequest) -> impl Future<Output = eyre::Result<TxHash>> + Send;

    /// Wait until the transaction is included in a block.
    fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = eyre::Result<Confirmation>> + Send;
}

/// Inclusion result of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block number where transaction was included
    pub block_number: Option<u64>,
    /// Gas used
    pub gas_used: u64,
    /// False if the transaction reverted
    pub success: bool,
}
