//! Send one ERC20 token to many recipients in a single transaction.
//!
//! - `send`: read the recipient list, approve if needed, call the disperse contract
//! - `networks`: list the networks with a known disperse deployment

use clap::{Parser, Subcommand};
use config::{Network, NetworkConfig};
use disperse::{
    config::Config,
    metrics::{install_prometheus_exporter, Metrics},
    read_recipients, run_submission, spawn_state_printer, view,
};
use tracing::info;
use workflow::{DisperseRequest, DisperseWorkflow, ProviderWallet, Wallet};

#[derive(Parser)]
#[command(name = "disperse")]
#[command(about = "Send an ERC20 token to many recipients in one transaction")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Private key for signing transactions (hex string, with or without 0x prefix)
    #[arg(short = 'k', long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Dry-run mode: validate and print the plan without sending transactions
    #[arg(long)]
    dry_run: bool,

    /// Print the plan or outcome as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Disperse a token to the recipients listed in a file
    Send {
        /// Token contract address
        #[arg(short, long)]
        token: String,

        /// Recipient list, one `address,amount` per line ("-" reads stdin)
        #[arg(short, long, default_value = "-")]
        recipients: String,
    },

    /// List networks with a known disperse deployment
    Networks,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (token, recipients) = match cli.command {
        Command::Networks => {
            for network in Network::ALL {
                let config = NetworkConfig::from_network(network);
                println!(
                    "{:<14} chain {:<7} disperse {} explorer {}",
                    network.to_string(),
                    config.chain_id,
                    config.disperse,
                    config.explorer_url
                );
            }
            return Ok(());
        }
        Command::Send { token, recipients } => (token, recipients),
    };

    let mut config = Config::from_file(&cli.config)?;

    // Override dry_run from CLI flag
    if cli.dry_run {
        config.dry_run = true;
    }

    if let Some(port) = config.metrics_port {
        install_prometheus_exporter(port)?;
        info!(port, "Serving metrics");
    }

    let request = DisperseRequest::new(token, read_recipients(&recipients).await?);

    match &cli.private_key {
        Some(private_key) => {
            let signer = client::parse_signer(private_key)?;
            let (provider, account) = client::create_wallet_provider(&config.rpc_url, signer)?;
            let network = config.network_config(client::chain_id(&provider).await?)?;

            run(ProviderWallet::new(provider, account), &network, &request, &config, cli.json).await
        }
        None => {
            let provider = client::create_provider(&config.rpc_url).await?;
            let network = config.network_config(client::chain_id(&provider).await?)?;

            // Without a key only a dry run can name an account to read for.
            let wallet = match config.account {
                Some(account) if config.dry_run => ProviderWallet::new(provider, account),
                _ => ProviderWallet::disconnected(provider),
            };

            run(wallet, &network, &request, &config, cli.json).await
        }
    }
}

async fn run<W>(
    wallet: W,
    network: &NetworkConfig,
    request: &DisperseRequest,
    config: &Config,
    json: bool,
) -> eyre::Result<()>
where
    W: Wallet,
{
    let mut workflow = DisperseWorkflow::new(wallet, network.disperse);

    info!("Loaded config:");
    info!("  Network: {} ({})", network.network, network.chain_id);
    info!("  Disperse: {}", workflow.disperse_address());
    match workflow.wallet().account() {
        Some(account) => info!("  Account: {}", account),
        None => info!("  Account: not connected"),
    }
    if config.dry_run {
        info!("  Mode: DRY-RUN (no transactions will be executed)");
    }

    if config.dry_run {
        let plan = workflow.plan(request).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            println!("{}", view::render_plan(&plan, network));
        }
        return Ok(());
    }

    let printer = spawn_state_printer(workflow.subscribe(), network.clone());
    let metrics = Metrics::new();

    let result = run_submission(&mut workflow, request, &metrics).await;

    // The printer stops on the terminal state, or when the channel closes.
    drop(workflow);
    printer.await?;

    let outcome = result.map_err(|e| eyre::eyre!("Disperse failed ({})", e.kind()))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    Ok(())
}
