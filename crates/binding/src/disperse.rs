//! Disperse contract bindings.
//!
//! The contract pulls `sum(values)` of `token` from the caller (which must have
//! approved it beforehand) and forwards each value to the matching recipient.

use alloy_sol_types::sol;

sol! {
    /// Disperse - Sends a single token to many recipients in one transaction
    #[sol(rpc)]
    interface IDisperse {
        /// Transfer `values[i]` of `token` from the caller to `recipients[i]`.
        ///
        /// Reverts as a whole if any single transfer fails.
        function disperseToken(
            address token,
            address[] calldata recipients,
            uint256[] calldata values
        ) external;
    }
}
