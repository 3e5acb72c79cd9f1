//! Recipient list parsing.
//!
//! Input is free text with one `address,amount` pair per line. Addresses are
//! validated here; amounts are kept as text and parsed in [`crate::amount`],
//! so a malformed amount is reported separately from a malformed address.

use crate::{BatchError, RecipientEntry};
use alloy_primitives::Address;

/// Parse and validate a single `0x`-prefixed account address.
///
/// An all-lowercase hex body is accepted as-is. Any uppercase letter means the
/// body must match its EIP-55 checksum exactly.
pub fn parse_address(input: &str) -> Result<Address, BatchError> {
    let invalid = || BatchError::InvalidAddress(input.to_string());

    let hex = input.strip_prefix("0x").ok_or_else(invalid)?;
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let address: Address = hex.parse().map_err(|_| invalid())?;

    let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());
    if has_upper && address.to_checksum(None) != input {
        return Err(invalid());
    }

    Ok(address)
}

/// Parse the recipient list.
///
/// Blank lines are skipped. Each remaining line is split on its first comma;
/// the first invalid address aborts the whole parse.
pub fn parse_recipients(input: &str) -> Result<Vec<RecipientEntry>, BatchError> {
    let mut entries = Vec::new();

    for line in input.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let (raw_address, raw_amount) = line.split_once(',').unwrap_or((line, ""));
        let raw_address = raw_address.trim();

        let address = parse_address(raw_address)?;

        entries.push(RecipientEntry {
            address,
            raw_address: raw_address.to_string(),
            raw_amount: raw_amount.trim().to_string(),
        });
    }

    Ok(entries)
}
