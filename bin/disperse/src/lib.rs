pub mod config;
pub mod metrics;
pub mod view;

use ::config::NetworkConfig;
use metrics::Metrics;
use std::time::Instant;
use tokio::{io::AsyncReadExt, sync::watch, task::JoinHandle};
use workflow::{DisperseError, DisperseOutcome, DisperseRequest, DisperseWorkflow, Wallet, WorkflowState};

/// Run one submission and record its metrics.
pub async fn run_submission<W>(
    workflow: &mut DisperseWorkflow<W>,
    request: &DisperseRequest,
    metrics: &Metrics,
) -> Result<DisperseOutcome, DisperseError>
where
    W: Wallet,
{
    let started = Instant::now();
    let result = workflow.submit(request).await;
    metrics.record_submission(&result, started.elapsed());

    result
}

/// Read the recipient list from a file, or from stdin when `source` is `-`.
pub async fn read_recipients(source: &str) -> eyre::Result<String> {
    if source == "-" {
        let mut input = String::new();
        tokio::io::stdin().read_to_string(&mut input).await?;
        return Ok(input);
    }

    Ok(tokio::fs::read_to_string(source).await?)
}

/// Print every state transition until the submission reaches a terminal state
/// or the workflow is dropped.
pub fn spawn_state_printer(
    mut receiver: watch::Receiver<WorkflowState>,
    network: NetworkConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while receiver.changed().await.is_ok() {
            let state = receiver.borrow_and_update().clone();
            if state != WorkflowState::Idle {
                println!("{}", view::render(&state, &network));
            }
            if state.is_terminal() {
                break;
            }
        }
    })
}
