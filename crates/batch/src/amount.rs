//! Decimal amount to base-unit conversion.
//!
//! The conversion itself is alloy's `parse_units`; this module decides which
//! inputs reach it. An amount that cannot be represented exactly in base units
//! is rejected rather than rounded.

use crate::{BatchError, NormalizedTransfer, RecipientEntry};
use alloy_primitives::{
    utils::{parse_units, ParseUnits},
    U256,
};

/// Convert a decimal amount such as `10.5` into base units: `amount × 10^decimals`.
///
/// Accepts `123`, `123.`, `.5` and `123.45`. Signs, exponents, separators and
/// more fractional digits than `decimals` are rejected.
pub fn parse_amount(raw: &str, decimals: u8) -> Result<U256, BatchError> {
    let invalid = |reason| BatchError::InvalidAmount {
        amount: raw.to_string(),
        reason,
    };

    if raw.is_empty() {
        return Err(invalid("amount is empty"));
    }

    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("amount has no digits"));
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid("amount must be a non-negative decimal number"));
    }
    if fraction.len() > usize::from(decimals) {
        return Err(invalid("amount has more decimal places than the token"));
    }

    let overflow = || invalid("amount does not fit in 256 bits");
    let whole = if whole.is_empty() { "0" } else { whole };

    // parse_units does not check its final multiplication, so the whole part
    // plus the largest possible fraction must already fit.
    let scale = U256::from(10u8)
        .checked_pow(U256::from(decimals))
        .ok_or_else(overflow)?;
    U256::from_str_radix(whole, 10)
        .ok()
        .and_then(|w| w.checked_mul(scale))
        .and_then(|w| w.checked_add(scale - U256::from(1u8)))
        .ok_or_else(overflow)?;

    let amount = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    };

    match parse_units(&amount, decimals).map_err(|_| overflow())? {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(_) => Err(invalid("amount must be a non-negative decimal number")),
    }
}

/// Normalize one recipient entry into base units.
pub fn normalize(entry: &RecipientEntry, decimals: u8) -> Result<NormalizedTransfer, BatchError> {
    Ok(NormalizedTransfer {
        address: entry.address,
        amount: parse_amount(&entry.raw_amount, decimals)?,
    })
}
