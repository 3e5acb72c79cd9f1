//! ERC20 token contract bindings.
//!
//! Only the allowance surface the disperse flow needs is declared here.

use alloy_sol_types::sol;

sol! {
    /// ERC20 allowance and metadata surface
    #[sol(rpc)]
    interface IERC20 {
        /// Amount `spender` may still pull from `owner`
        function allowance(address owner, address spender) external view returns (uint256);

        /// Set the amount `spender` may pull from the caller
        function approve(address spender, uint256 amount) external returns (bool);

        /// Number of fractional digits of one whole token
        function decimals() external view returns (uint8);
    }
}
