//! Observable workflow state.

use crate::DisperseError;
use alloy_primitives::TxHash;
use std::fmt;

/// Step of a submission that is waiting on the wallet or the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Approval transaction signed, sent or awaiting inclusion
    Approving,
    /// Disperse transaction being simulated, signed and sent
    Submitting,
    /// Disperse transaction sent, awaiting inclusion
    Confirming,
}

impl Stage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approving => "approving",
            Self::Submitting => "submitting",
            Self::Confirming => "confirming",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of the most recent submission.
///
/// Overwritten as a whole on every transition; only the active workflow writes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WorkflowState {
    #[default]
    Idle,
    Pending(Stage),
    /// Confirmed disperse transaction
    Success(TxHash),
    Failed(DisperseError),
}

impl WorkflowState {
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Failed(_))
    }
}
