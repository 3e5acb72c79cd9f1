//! Terminal rendering of workflow state.
//!
//! Reads [`WorkflowState`] only; never drives the workflow.

use ::config::NetworkConfig;
use alloy_primitives::{utils::format_units, U256};
use workflow::{DispersePlan, Stage, WorkflowState};

/// Shorten a long hex string to `start` leading and `end` trailing characters.
pub fn shorten(value: &str, start: usize, end: usize) -> String {
    if value.len() <= start + end {
        return value.to_string();
    }
    format!("{}...{}", &value[..start], &value[value.len() - end..])
}

/// One-line notice for the state.
pub fn notice(state: &WorkflowState) -> String {
    match state {
        WorkflowState::Idle => "Ready to send.".to_string(),
        WorkflowState::Pending(Stage::Approving) => {
            "Approving tokens. Sign the approval in your wallet.".to_string()
        }
        WorkflowState::Pending(Stage::Submitting) => {
            "Sign the transactions to send the tokens.".to_string()
        }
        WorkflowState::Pending(Stage::Confirming) => {
            "Waiting for the transaction to be confirmed.".to_string()
        }
        WorkflowState::Success(_) => "Tokens sent successfully.".to_string(),
        WorkflowState::Failed(err) => err.to_string(),
    }
}

/// Full rendering, including the explorer link once the tokens are sent.
pub fn render(state: &WorkflowState, network: &NetworkConfig) -> String {
    match state {
        WorkflowState::Success(tx_hash) => {
            let hash = tx_hash.to_string();
            format!(
                "All done! Your tokens have been successfully sent. \
                 You can view your transaction here: {} ({})",
                network.tx_url(tx_hash),
                shorten(&hash, 20, 20)
            )
        }
        WorkflowState::Failed(err) => format!("Error: {err}"),
        _ => notice(state),
    }
}

/// Human-readable summary of a dry run.
pub fn render_plan(plan: &DispersePlan, network: &NetworkConfig) -> String {
    let decimals = plan.metadata.decimals;
    let mut lines = vec![
        format!("Network:    {} ({})", network.network, network.chain_id),
        format!("Account:    {}", plan.account),
        format!("Token:      {} ({} decimals)", plan.token, decimals),
        format!(
            "Disperse:   {} {}",
            plan.spender,
            network.address_url(&plan.spender)
        ),
        format!("Recipients: {}", plan.batch.len()),
        format!("Total:      {}", format_amount(plan.total, decimals)),
        format!("Allowance:  {}", format_amount(plan.allowance, decimals)),
    ];

    lines.push(match plan.approval {
        Some(amount) => format!("Approval:   {} required", format_amount(amount, decimals)),
        None => "Approval:   not required".to_string(),
    });

    for transfer in plan.batch.transfers() {
        lines.push(format!(
            "  {} {}",
            transfer.address,
            format_amount(transfer.amount, decimals)
        ));
    }

    lines.join("\n")
}

fn format_amount(amount: U256, decimals: u8) -> String {
    format_units(amount, decimals).unwrap_or_else(|_| format!("{amount} base units"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{b256, Address};
    use batch::{parse_recipients, BatchError, TransferBatch};
    use workflow::{DisperseError, TokenMetadata};

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("0x1234567890", 4, 2), "0x12...90");
        assert_eq!(shorten("0x12", 4, 2), "0x12");
    }

    #[test]
    fn test_render_success_links_explorer() {
        let network = NetworkConfig::taiko_hekla();
        let hash = b256!("0xabababababababababababababababababababababababababababababababab");

        let text = render(&WorkflowState::Success(hash), &network);

        assert!(text.starts_with("All done!"));
        assert!(text.contains(
            "https://hekla.taikoscan.io/tx/0xabababababababababababababababababababababababababababababababab"
        ));
        assert!(text.contains("(0xababababababababab...abababababababababab)"));
    }

    #[test]
    fn test_render_failure_shows_user_message() {
        let network = NetworkConfig::taiko_mainnet();
        let state = WorkflowState::Failed(DisperseError::from(BatchError::InvalidAddress(
            "notanaddress".to_string(),
        )));

        assert_eq!(
            render(&state, &network),
            "Error: Please enter a valid recipient address. notanaddress is not a valid address."
        );
    }

    #[test]
    fn test_render_plan() {
        let network = NetworkConfig::taiko_mainnet();
        let entries =
            parse_recipients("0xeD38571DEE9605EDB90323964E2F12Ad026c6C11,10.5").unwrap();
        let batch = TransferBatch::build(&entries, 6).unwrap();

        let plan = DispersePlan {
            account: Address::repeat_byte(1),
            token: Address::repeat_byte(2),
            spender: network.disperse,
            metadata: TokenMetadata { decimals: 6 },
            allowance: U256::from(500_000),
            total: batch.total().unwrap(),
            batch,
            approval: Some(U256::from(10_000_000)),
        };

        let text = render_plan(&plan, &network);
        assert!(text.contains("Taiko Mainnet (167000)"));
        assert!(text.contains("Recipients: 1"));
        assert!(text.contains("Total:      10.500000"));
        assert!(text.contains("Approval:   10.000000 required"));
        assert!(text.contains("0xeD38571DEE9605EDB90323964E2F12Ad026c6C11 10.500000"));
    }
}
