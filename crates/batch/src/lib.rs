//! Recipient list handling for token dispersal.
//!
//! Turns the free-text recipient list (`address,amount` per line) into a
//! [`TransferBatch`] ready for submission:
//! - [`parser`] validates addresses and keeps amounts as text
//! - [`amount`] converts decimal amounts into integer base units
//! - [`TransferBatch::build`] normalizes every entry and rejects duplicates

pub mod amount;
pub mod parser;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub use amount::{normalize, parse_amount};
pub use parser::{parse_address, parse_recipients};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// A recipient (or token) address failed validation
    #[error("Please enter a valid recipient address. {0} is not a valid address.")]
    InvalidAddress(String),

    /// The same recipient appears on more than one line
    #[error("Duplicate address found: {address} with amount {amount}")]
    DuplicateAddress { address: Address, amount: String },

    /// An amount is not a non-negative decimal representable in base units
    #[error("Invalid amount '{amount}': {reason}")]
    InvalidAmount { amount: String, reason: &'static str },

    /// The recipient list has no entries
    #[error("Please enter at least one recipient.")]
    NoRecipients,

    /// The sum of all amounts does not fit in 256 bits
    #[error("Total amount overflows 256 bits")]
    TotalOverflow,
}

/// One parsed line of the recipient list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientEntry {
    /// Validated recipient
    pub address: Address,
    /// Address text exactly as typed
    pub raw_address: String,
    /// Amount text, not yet parsed
    pub raw_amount: String,
}

/// A transfer expressed in token base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTransfer {
    pub address: Address,
    pub amount: U256,
}

/// Ordered transfers for one disperse submission.
///
/// Recipients are pairwise distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferBatch {
    transfers: Vec<NormalizedTransfer>,
}

impl TransferBatch {
    /// Normalize `entries` with the token's `decimals` and check for duplicates.
    ///
    /// Entries keep their input order. The first failing entry aborts the build.
    pub fn build(entries: &[RecipientEntry], decimals: u8) -> Result<Self, BatchError> {
        if entries.is_empty() {
            return Err(BatchError::NoRecipients);
        }

        let mut seen = HashSet::with_capacity(entries.len());
        let mut transfers = Vec::with_capacity(entries.len());

        for entry in entries {
            if !seen.insert(entry.address) {
                return Err(BatchError::DuplicateAddress {
                    address: entry.address,
                    amount: entry.raw_amount.clone(),
                });
            }

            transfers.push(normalize(entry, decimals)?);
        }

        Ok(Self { transfers })
    }

    pub fn transfers(&self) -> &[NormalizedTransfer] {
        &self.transfers
    }

    /// Recipient list in submission order.
    pub fn recipients(&self) -> Vec<Address> {
        self.transfers.iter().map(|t| t.address).collect()
    }

    /// Amount list in submission order, aligned with [`Self::recipients`].
    pub fn amounts(&self) -> Vec<U256> {
        self.transfers.iter().map(|t| t.amount).collect()
    }

    /// Sum of all amounts.
    pub fn total(&self) -> Result<U256, BatchError> {
        self.transfers
            .iter()
            .try_fold(U256::ZERO, |acc, t| acc.checked_add(t.amount))
            .ok_or(BatchError::TotalOverflow)
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }
}
