use crate::{Confirmation, DisperseError, Stage, Wallet, WorkflowState};
use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use batch::{parse_address, parse_recipients, TransferBatch};
use binding::{disperse::IDisperse, token::IERC20};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Raw user input for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisperseRequest {
    /// Token contract address as typed
    pub token: String,
    /// Recipient list, one `address,amount` per line
    pub recipients: String,
}

impl DisperseRequest {
    pub fn new(token: impl Into<String>, recipients: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            recipients: recipients.into(),
        }
    }
}

/// On-chain token metadata, read fresh on every submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub decimals: u8,
}

/// Everything decided before the first transaction is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispersePlan {
    /// Sending account
    pub account: Address,
    /// Token being dispersed
    pub token: Address,
    /// Disperse contract (the spender)
    pub spender: Address,
    pub metadata: TokenMetadata,
    /// Allowance the spender already has
    pub allowance: U256,
    pub batch: TransferBatch,
    /// Sum of all transfers in base units
    pub total: U256,
    /// Additional allowance to approve, if the current one is short
    pub approval: Option<U256>,
}

/// Result of a confirmed submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisperseOutcome {
    /// Approval transaction, if one was needed
    pub approval: Option<Confirmation>,
    /// Disperse transaction
    pub disperse: Confirmation,
    /// Total base units sent
    pub total: U256,
    /// Number of recipients
    pub recipients: usize,
}

/// Drives submissions against one disperse contract.
///
/// The current [`WorkflowState`] is published on a watch channel; readers get
/// a receiver from [`Self::subscribe`].
pub struct DisperseWorkflow<W> {
    wallet: W,
    disperse: Address,
    state: watch::Sender<WorkflowState>,
}

impl<W> DisperseWorkflow<W>
where
    W: Wallet,
{
    /// Create a workflow that sends through `wallet` to the disperse contract at `disperse`.
    pub fn new(wallet: W, disperse: Address) -> Self {
        let (state, _) = watch::channel(WorkflowState::Idle);
        Self {
            wallet,
            disperse,
            state,
        }
    }

    pub const fn disperse_address(&self) -> Address {
        self.disperse
    }

    pub const fn wallet(&self) -> &W {
        &self.wallet
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    /// Current state.
    pub fn state(&self) -> WorkflowState {
        self.state.borrow().clone()
    }

    /// Run one submission to completion.
    ///
    /// Always leaves the state terminal: `Success` with the disperse hash, or
    /// `Failed` with the returned error. Dropping the future mid-flight moves a
    /// pending state to `Failed(UnknownFailure)`.
    pub async fn submit(
        &mut self,
        request: &DisperseRequest,
    ) -> Result<DisperseOutcome, DisperseError> {
        self.state.send_replace(WorkflowState::Idle);
        let _guard = PendingGuard {
            state: &self.state,
        };

        let result = self.execute(request).await;

        match &result {
            Ok(outcome) => {
                info!(
                    tx_hash = %outcome.disperse.tx_hash,
                    block_number = outcome.disperse.block_number,
                    recipients = outcome.recipients,
                    total = %outcome.total,
                    "Tokens dispersed."
                );
                self.state
                    .send_replace(WorkflowState::Success(outcome.disperse.tx_hash));
            }
            Err(err) => {
                warn!(kind = %err.kind(), detail = err.detail(), "{err}");
                self.state.send_replace(WorkflowState::Failed(err.clone()));
            }
        }

        result
    }

    /// Validate the request and read the chain without sending anything.
    ///
    /// Does not touch the observable state.
    pub async fn plan(&self, request: &DisperseRequest) -> Result<DispersePlan, DisperseError> {
        let account = self
            .wallet
            .account()
            .ok_or(DisperseError::NoWalletConnected)?;

        let token = parse_address(request.token.trim())
            .map_err(|_| DisperseError::InvalidTokenAddress(request.token.clone()))?;

        let (allowance, metadata) = self.read_token_state(token, account).await.map_err(|e| {
            error!(token = %token, error = ?e, "Failed to read token state");
            DisperseError::UnknownFailure(format!("{e:#}"))
        })?;

        debug!(
            token = %token,
            allowance = %allowance,
            decimals = metadata.decimals,
            "Read token state"
        );

        let entries = parse_recipients(&request.recipients)?;
        let batch = TransferBatch::build(&entries, metadata.decimals)?;
        let total = batch.total()?;

        let approval = (allowance < total).then(|| total - allowance);

        Ok(DispersePlan {
            account,
            token,
            spender: self.disperse,
            metadata,
            allowance,
            batch,
            total,
            approval,
        })
    }

    async fn execute(&self, request: &DisperseRequest) -> Result<DisperseOutcome, DisperseError> {
        let plan = self.plan(request).await?;

        let approval = match plan.approval {
            Some(amount) => Some(self.approve(&plan, amount).await?),
            None => {
                debug!(allowance = %plan.allowance, total = %plan.total, "Allowance sufficient");
                None
            }
        };

        let disperse = self.disperse(&plan).await?;

        Ok(DisperseOutcome {
            approval,
            disperse,
            total: plan.total,
            recipients: plan.batch.len(),
        })
    }

    async fn read_token_state(
        &self,
        token: Address,
        owner: Address,
    ) -> eyre::Result<(U256, TokenMetadata)> {
        let allowance = self.read_allowance(token, owner).await?;
        let metadata = self.read_metadata(token).await?;

        Ok((allowance, metadata))
    }

    async fn read_allowance(&self, token: Address, owner: Address) -> eyre::Result<U256> {
        let call = IERC20::allowanceCall {
            owner,
            spender: self.disperse,
        };
        let tx = TransactionRequest::default()
            .with_to(token)
            .with_input(call.abi_encode());

        let output = self.wallet.call(tx).await?;
        Ok(IERC20::allowanceCall::abi_decode_returns(&output)?)
    }

    async fn read_metadata(&self, token: Address) -> eyre::Result<TokenMetadata> {
        let tx = TransactionRequest::default()
            .with_to(token)
            .with_input(IERC20::decimalsCall {}.abi_encode());

        let output = self.wallet.call(tx).await?;
        let decimals = IERC20::decimalsCall::abi_decode_returns(&output)?;

        Ok(TokenMetadata { decimals })
    }

    /// Approve `amount` more for the disperse contract and wait for inclusion.
    async fn approve(
        &self,
        plan: &DispersePlan,
        amount: U256,
    ) -> Result<Confirmation, DisperseError> {
        self.state
            .send_replace(WorkflowState::Pending(Stage::Approving));

        info!(
            token = %plan.token,
            spender = %self.disperse,
            allowance = %plan.allowance,
            amount = %amount,
            "Approving tokens"
        );

        let call = IERC20::approveCall {
            spender: self.disperse,
            amount,
        };
        let tx = TransactionRequest::default()
            .with_from(plan.account)
            .with_to(plan.token)
            .with_input(call.abi_encode());

        let result = async {
            let tx_hash = self.simulate_and_send(tx).await?;
            self.confirm(tx_hash).await
        }
        .await;

        result
            .inspect(|confirmation| {
                info!(
                    tx_hash = %confirmation.tx_hash,
                    block_number = confirmation.block_number,
                    "Approval confirmed"
                );
            })
            .map_err(|e| {
                error!(error = ?e, "Approval failed");
                DisperseError::ApprovalFailed(format!("{e:#}"))
            })
    }

    /// Send the disperse call and wait for inclusion.
    async fn disperse(&self, plan: &DispersePlan) -> Result<Confirmation, DisperseError> {
        self.state
            .send_replace(WorkflowState::Pending(Stage::Submitting));

        info!(
            contract = %self.disperse,
            token = %plan.token,
            recipients = plan.batch.len(),
            total = %plan.total,
            "Submitting disperse"
        );

        let call = IDisperse::disperseTokenCall {
            token: plan.token,
            recipients: plan.batch.recipients(),
            values: plan.batch.amounts(),
        };
        let tx = TransactionRequest::default()
            .with_from(plan.account)
            .with_to(self.disperse)
            .with_input(call.abi_encode());

        let to_failure = |e: eyre::Report| {
            error!(error = ?e, "Disperse failed");
            DisperseError::SubmissionFailed(format!("{e:#}"))
        };

        let tx_hash = self.simulate_and_send(tx).await.map_err(to_failure)?;

        self.state
            .send_replace(WorkflowState::Pending(Stage::Confirming));
        info!(tx_hash = %tx_hash, "Waiting for disperse confirmation");

        self.confirm(tx_hash).await.map_err(to_failure)
    }

    async fn simulate_and_send(&self, tx: TransactionRequest) -> eyre::Result<TxHash> {
        self.wallet.simulate(tx.clone()).await?;
        self.wallet.send(tx).await
    }

    async fn confirm(&self, tx_hash: TxHash) -> eyre::Result<Confirmation> {
        let confirmation = self.wallet.wait_for_confirmation(tx_hash).await?;
        if !confirmation.success {
            eyre::bail!("Transaction {tx_hash} reverted");
        }
        Ok(confirmation)
    }
}

/// Moves a pending state to `Failed` if a submission ends without reaching a
/// terminal state.
struct PendingGuard<'a> {
    state: &'a watch::Sender<WorkflowState>,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let pending = self.state.borrow().is_pending();
        if pending {
            warn!("Submission interrupted while pending");
            self.state.send_replace(WorkflowState::Failed(DisperseError::UnknownFailure(
                "submission interrupted".to_string(),
            )));
        }
    }
}
