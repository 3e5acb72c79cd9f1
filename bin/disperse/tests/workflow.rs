//! Integration tests for the disperse workflow against an in-memory wallet.
//!
//! Run with:
//! ```bash
//! cargo test --package disperse --test workflow
//! ```

use alloy_primitives::{address, U256};
use config::NetworkConfig;
use disperse::{metrics::Metrics, run_submission, spawn_state_printer};
use setup::{
    account, disperse_contract, setup_workflow, token, units, MockWallet, SentTx, TOKEN,
};
use std::time::Duration;
use workflow::{DisperseError, DisperseRequest, ErrorKind, Stage, WorkflowState};

const RECIPIENT: &str = "0xeD38571DEE9605EDB90323964E2F12Ad026c6C11";
const BOB: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
const CAROL: &str = "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB";

fn request(recipients: &str) -> DisperseRequest {
    DisperseRequest::new(TOKEN, recipients)
}

#[tokio::test]
async fn test_zero_allowance_approves_then_disperses() {
    let wallet = MockWallet::new(U256::ZERO, 18);
    let mut workflow = setup_workflow(&wallet);

    let outcome = workflow
        .submit(&request(&format!("{RECIPIENT},10")))
        .await
        .expect("submission should succeed");

    let ten_tokens = U256::from(10_000_000_000_000_000_000u128);
    assert_eq!(
        wallet.sent(),
        vec![
            SentTx::Approve {
                token: token(),
                spender: disperse_contract(),
                amount: ten_tokens,
            },
            SentTx::Disperse {
                contract: disperse_contract(),
                token: token(),
                recipients: vec![address!("eD38571DEE9605EDB90323964E2F12Ad026c6C11")],
                values: vec![ten_tokens],
            },
        ]
    );

    assert!(outcome.approval.is_some());
    assert_eq!(outcome.total, ten_tokens);
    assert_eq!(outcome.recipients, 1);
    assert_eq!(
        workflow.state(),
        WorkflowState::Success(outcome.disperse.tx_hash)
    );
}

#[tokio::test]
async fn test_stages_are_published_in_order() {
    let wallet = MockWallet::new(U256::ZERO, 18);
    let mut workflow = setup_workflow(&wallet);

    workflow
        .submit(&request(&format!("{RECIPIENT},1\n{BOB},2")))
        .await
        .unwrap();

    // approve send, approve wait, disperse send, disperse wait
    assert_eq!(
        wallet.chain().observed,
        vec![
            WorkflowState::Pending(Stage::Approving),
            WorkflowState::Pending(Stage::Approving),
            WorkflowState::Pending(Stage::Submitting),
            WorkflowState::Pending(Stage::Confirming),
        ]
    );
}

#[tokio::test]
async fn test_sufficient_allowance_skips_approval() {
    let wallet = MockWallet::new(units(3, 6), 6);
    let mut workflow = setup_workflow(&wallet);

    let outcome = workflow
        .submit(&request(&format!("{RECIPIENT},1.5\n{BOB},1.5")))
        .await
        .unwrap();

    assert!(outcome.approval.is_none());
    assert_eq!(
        wallet.sent(),
        vec![SentTx::Disperse {
            contract: disperse_contract(),
            token: token(),
            recipients: vec![RECIPIENT.parse().unwrap(), BOB.parse().unwrap()],
            values: vec![U256::from(1_500_000), U256::from(1_500_000)],
        }]
    );
    assert_eq!(
        wallet.chain().observed,
        vec![
            WorkflowState::Pending(Stage::Submitting),
            WorkflowState::Pending(Stage::Confirming),
        ]
    );
}

#[tokio::test]
async fn test_partial_allowance_approves_the_difference() {
    let wallet = MockWallet::new(units(4, 18), 18);
    let mut workflow = setup_workflow(&wallet);

    workflow
        .submit(&request(&format!("{RECIPIENT},7\n{BOB},3")))
        .await
        .unwrap();

    let sent = wallet.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(
        sent[0],
        SentTx::Approve {
            token: token(),
            spender: disperse_contract(),
            amount: units(6, 18),
        }
    );
}

#[tokio::test]
async fn test_invalid_address_sends_nothing() {
    let wallet = MockWallet::new(U256::ZERO, 18);
    let mut workflow = setup_workflow(&wallet);

    let err = workflow
        .submit(&request("notanaddress,5"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidAddress);
    assert!(err.to_string().contains("notanaddress is not a valid address"));
    assert!(wallet.sent().is_empty());
    assert_eq!(wallet.chain().simulations, 0);
    assert_eq!(workflow.state(), WorkflowState::Failed(err));
}

#[tokio::test]
async fn test_duplicate_address_sends_nothing() {
    let wallet = MockWallet::new(U256::ZERO, 18);
    let mut workflow = setup_workflow(&wallet);

    let input = format!("{RECIPIENT},1\n{BOB},2\n{},3", RECIPIENT.to_lowercase());
    let err = workflow.submit(&request(&input)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DuplicateAddress);
    assert_eq!(
        err.to_string(),
        format!("Duplicate address found: {RECIPIENT} with amount 3")
    );
    assert!(wallet.sent().is_empty());
}

#[tokio::test]
async fn test_invalid_amount_sends_nothing() {
    let wallet = MockWallet::new(U256::ZERO, 6);
    let mut workflow = setup_workflow(&wallet);

    for input in [
        format!("{RECIPIENT},abc"),
        format!("{RECIPIENT},-1"),
        format!("{RECIPIENT},0.0000001"),
        RECIPIENT.to_string(),
        String::new(),
    ] {
        let err = workflow.submit(&request(&input)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmountFormat, "input {input:?}");
    }

    assert!(wallet.sent().is_empty());
}

#[tokio::test]
async fn test_no_wallet_makes_no_calls() {
    let wallet = MockWallet::disconnected();
    let mut workflow = setup_workflow(&wallet);

    let err = workflow
        .submit(&request(&format!("{RECIPIENT},1")))
        .await
        .unwrap_err();

    assert_eq!(err, DisperseError::NoWalletConnected);
    assert_eq!(err.to_string(), "Please connect your wallet.");
    assert_eq!(wallet.chain().reads, 0);
}

#[tokio::test]
async fn test_invalid_token_makes_no_calls() {
    let wallet = MockWallet::new(U256::ZERO, 18);
    let mut workflow = setup_workflow(&wallet);

    let err = workflow
        .submit(&DisperseRequest::new("0xAbC", format!("{RECIPIENT},1")))
        .await
        .unwrap_err();

    assert_eq!(err, DisperseError::InvalidTokenAddress("0xAbC".to_string()));
    assert_eq!(err.to_string(), "Please enter a valid token address.");
    assert_eq!(wallet.chain().reads, 0);
}

#[tokio::test]
async fn test_read_failure_is_unknown_failure() {
    let wallet = MockWallet::new(U256::ZERO, 18);
    wallet.chain().fail_reads = true;
    let mut workflow = setup_workflow(&wallet);

    let err = workflow
        .submit(&request(&format!("{RECIPIENT},1")))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnknownFailure);
    assert!(err.detail().unwrap().contains("connection refused"));
    assert!(wallet.sent().is_empty());
}

#[tokio::test]
async fn test_rejected_approval_skips_disperse() {
    let wallet = MockWallet::new(U256::ZERO, 18);
    wallet.chain().reject_approval = true;
    let mut workflow = setup_workflow(&wallet);

    let err = workflow
        .submit(&request(&format!("{RECIPIENT},1")))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ApprovalFailed);
    assert!(err.detail().unwrap().contains("User rejected"));
    assert_eq!(
        err.to_string(),
        "Something went wrong while approving the tokens."
    );
    assert!(wallet.sent().is_empty());
    assert!(matches!(workflow.state(), WorkflowState::Failed(_)));
}

#[tokio::test]
async fn test_reverted_approval_skips_disperse() {
    let wallet = MockWallet::new(U256::ZERO, 18);
    wallet.chain().revert_approval = true;
    let mut workflow = setup_workflow(&wallet);

    let err = workflow
        .submit(&request(&format!("{RECIPIENT},1")))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ApprovalFailed);
    assert!(err.detail().unwrap().contains("reverted"));

    let sent = wallet.sent();
    assert_eq!(sent.len(), 1);
    assert!(matches!(sent[0], SentTx::Approve { .. }));
}

#[tokio::test]
async fn test_failed_simulation_never_sends_disperse() {
    let wallet = MockWallet::new(units(1, 18), 18);
    wallet.chain().reject_disperse = true;
    let mut workflow = setup_workflow(&wallet);

    let err = workflow
        .submit(&request(&format!("{RECIPIENT},1")))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SubmissionFailed);
    assert!(wallet.sent().is_empty());
    assert_eq!(workflow.state(), WorkflowState::Failed(err));
}

#[tokio::test]
async fn test_reverted_disperse_fails_while_confirming() {
    let wallet = MockWallet::new(U256::ZERO, 18);
    wallet.chain().revert_disperse = true;
    let mut workflow = setup_workflow(&wallet);

    let err = workflow
        .submit(&request(&format!("{RECIPIENT},1")))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SubmissionFailed);
    assert_eq!(
        err.to_string(),
        "Something went wrong while sending the tokens."
    );
    assert_eq!(wallet.sent().len(), 2);
    assert_eq!(
        wallet.chain().observed.last(),
        Some(&WorkflowState::Pending(Stage::Confirming))
    );
    assert!(matches!(workflow.state(), WorkflowState::Failed(_)));
}

#[tokio::test]
async fn test_resubmission_restarts_and_rereads() {
    let wallet = MockWallet::new(U256::ZERO, 18);
    let mut workflow = setup_workflow(&wallet);

    let first = workflow.submit(&request(&format!("{RECIPIENT},x"))).await;
    assert!(first.is_err());
    assert!(matches!(workflow.state(), WorkflowState::Failed(_)));

    let second = workflow
        .submit(&request(&format!("{RECIPIENT},1\n{CAROL},2")))
        .await
        .unwrap();

    assert_eq!(
        workflow.state(),
        WorkflowState::Success(second.disperse.tx_hash)
    );
    // allowance and decimals read once per submission
    assert_eq!(wallet.chain().reads, 4);
}

#[tokio::test]
async fn test_plan_sends_nothing() {
    let wallet = MockWallet::new(units(1, 18), 18);
    let workflow = setup_workflow(&wallet);

    let plan = workflow
        .plan(&request(&format!("{RECIPIENT},1\n{BOB},0.5")))
        .await
        .unwrap();

    assert_eq!(plan.account, account());
    assert_eq!(plan.token, token());
    assert_eq!(plan.spender, disperse_contract());
    assert_eq!(plan.metadata.decimals, 18);
    assert_eq!(plan.batch.len(), 2);
    assert_eq!(plan.total, U256::from(1_500_000_000_000_000_000u128));
    assert_eq!(plan.approval, Some(U256::from(500_000_000_000_000_000u128)));

    assert!(wallet.sent().is_empty());
    assert_eq!(wallet.chain().simulations, 0);
    assert_eq!(workflow.state(), WorkflowState::Idle);
}

#[tokio::test]
async fn test_dropped_submission_does_not_stay_pending() {
    let wallet = MockWallet::new(U256::ZERO, 18);
    wallet.chain().hang_confirmation = true;
    let mut workflow = setup_workflow(&wallet);

    let req = request(&format!("{RECIPIENT},1"));
    let result = tokio::time::timeout(Duration::from_millis(50), workflow.submit(&req)).await;
    assert!(result.is_err(), "submission should still be waiting");

    match workflow.state() {
        WorkflowState::Failed(err) => assert_eq!(err.kind(), ErrorKind::UnknownFailure),
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_resubmission_after_interrupted_submission() {
    let wallet = MockWallet::new(U256::ZERO, 18);
    wallet.chain().hang_confirmation = true;
    let mut workflow = setup_workflow(&wallet);

    let req = request(&format!("{RECIPIENT},1"));
    let interrupted = tokio::time::timeout(Duration::from_millis(50), workflow.submit(&req)).await;
    assert!(interrupted.is_err());
    assert!(!workflow.state().is_pending());

    wallet.chain().hang_confirmation = false;
    let outcome = workflow.submit(&req).await.unwrap();

    assert_eq!(
        workflow.state(),
        WorkflowState::Success(outcome.disperse.tx_hash)
    );
    // the interrupted approval, then a fresh approval and the disperse
    assert_eq!(wallet.sent().len(), 3);
}

#[tokio::test]
async fn test_state_printer_stops_on_terminal_state() {
    let wallet = MockWallet::new(U256::ZERO, 18);
    let mut workflow = setup_workflow(&wallet);
    let printer = spawn_state_printer(workflow.subscribe(), NetworkConfig::taiko_hekla());

    workflow
        .submit(&request(&format!("{RECIPIENT},1")))
        .await
        .unwrap();

    // the workflow is still alive, so only the terminal state can end the printer
    tokio::time::timeout(Duration::from_secs(1), printer)
        .await
        .expect("printer should stop after the terminal state")
        .unwrap();
    assert!(workflow.state().is_terminal());
}

#[tokio::test]
async fn test_run_submission_records_and_returns_outcome() {
    let wallet = MockWallet::new(U256::ZERO, 0);
    let mut workflow = setup_workflow(&wallet);
    let metrics = Metrics::new();

    let outcome = run_submission(
        &mut workflow,
        &request(&format!("{RECIPIENT},5\n{BOB},6\n{CAROL},7")),
        &metrics,
    )
    .await
    .unwrap();

    assert_eq!(outcome.recipients, 3);
    assert_eq!(outcome.total, U256::from(18));
    assert_eq!(outcome.disperse.block_number, Some(101));
}
