//! Failure taxonomy of a disperse submission.
//!
//! The `Display` text of every variant is the message shown to the user. The
//! underlying wallet/RPC error, when there is one, is kept as text and exposed
//! through [`DisperseError::detail`] for logs.

use batch::BatchError;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisperseError {
    /// No account is connected to the wallet
    #[error("Please connect your wallet.")]
    NoWalletConnected,

    /// The token field is not a valid address
    #[error("Please enter a valid token address.")]
    InvalidTokenAddress(String),

    /// The recipient list could not be turned into a transfer batch
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// The approval transaction was rejected, reverted or could not be sent
    #[error("Something went wrong while approving the tokens.")]
    ApprovalFailed(String),

    /// The disperse transaction was rejected, reverted or could not be sent
    #[error("Something went wrong while sending the tokens.")]
    SubmissionFailed(String),

    /// Anything else, including failed reads and interrupted submissions
    #[error("Something went wrong while sending the tokens.")]
    UnknownFailure(String),
}

impl DisperseError {
    /// Flat classification used for metrics and log fields.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoWalletConnected => ErrorKind::NoWalletConnected,
            Self::InvalidTokenAddress(_) => ErrorKind::InvalidTokenAddress,
            Self::Batch(BatchError::InvalidAddress(_)) => ErrorKind::InvalidAddress,
            Self::Batch(BatchError::DuplicateAddress { .. }) => ErrorKind::DuplicateAddress,
            Self::Batch(
                BatchError::InvalidAmount { .. }
                | BatchError::NoRecipients
                | BatchError::TotalOverflow,
            ) => ErrorKind::InvalidAmountFormat,
            Self::ApprovalFailed(_) => ErrorKind::ApprovalFailed,
            Self::SubmissionFailed(_) => ErrorKind::SubmissionFailed,
            Self::UnknownFailure(_) => ErrorKind::UnknownFailure,
        }
    }

    /// Underlying cause, if the failure came from the wallet or the chain.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::ApprovalFailed(detail)
            | Self::SubmissionFailed(detail)
            | Self::UnknownFailure(detail) => Some(detail),
            _ => None,
        }
    }

    /// True if the failure happened before anything was written on-chain.
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoWalletConnected | Self::InvalidTokenAddress(_) | Self::Batch(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NoWalletConnected,
    InvalidTokenAddress,
    InvalidAddress,
    DuplicateAddress,
    InvalidAmountFormat,
    ApprovalFailed,
    SubmissionFailed,
    UnknownFailure,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoWalletConnected => "no_wallet_connected",
            Self::InvalidTokenAddress => "invalid_token_address",
            Self::InvalidAddress => "invalid_address",
            Self::DuplicateAddress => "duplicate_address",
            Self::InvalidAmountFormat => "invalid_amount_format",
            Self::ApprovalFailed => "approval_failed",
            Self::SubmissionFailed => "submission_failed",
            Self::UnknownFailure => "unknown_failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
