//! [`Wallet`] implementation over an alloy provider.

use crate::{Confirmation, Wallet};
use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_provider::{PendingTransactionBuilder, Provider};
use alloy_rpc_types::TransactionRequest;
use tracing::debug;

/// Wallet backed by an RPC provider.
///
/// Signing happens inside the provider (see `client::create_wallet_provider`);
/// a read-only provider can still serve [`crate::DisperseWorkflow::plan`] when
/// given an account to read for.
#[derive(Debug, Clone)]
pub struct ProviderWallet<P> {
    provider: P,
    account: Option<Address>,
}

impl<P> ProviderWallet<P>
where
    P: Provider + Clone,
{
    /// Wallet that sends from `account`.
    pub const fn new(provider: P, account: Address) -> Self {
        Self {
            provider,
            account: Some(account),
        }
    }

    /// Wallet with no connected account.
    pub const fn disconnected(provider: P) -> Self {
        Self {
            provider,
            account: None,
        }
    }
}

impl<P> Wallet for ProviderWallet<P>
where
    P: Provider + Clone,
{
    fn account(&self) -> Option<Address> {
        self.account
    }

    async fn call(&self, tx: TransactionRequest) -> eyre::Result<Bytes> {
        let output = self.provider.call(tx).await?;
        Ok(output)
    }

    async fn simulate(&self, tx: TransactionRequest) -> eyre::Result<Bytes> {
        let tx = match (tx.from, self.account) {
            (None, Some(account)) => tx.with_from(account),
            _ => tx,
        };

        let output = self.provider.call(tx).await?;
        Ok(output)
    }

    async fn send(&self, tx: TransactionRequest) -> eyre::Result<TxHash> {
        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();

        debug!(tx_hash = %tx_hash, "Transaction sent");
        Ok(tx_hash)
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> eyre::Result<Confirmation> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await?;

        Ok(Confirmation {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            success: receipt.status(),
        })
    }
}
