//! walletctl
//!
//! Drives a wallet session against a JSON-RPC node: connects through an HTTP
//! provider standing in for the browser extension, then prints the session
//! or balance state as JSON.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use types::{SessionStatus, WalletId};
use wallet_config::{chain_name, WalletSettings};
use wallet_service::{
    AdapterRegistry, CustomTokenBalance, FetchOutcome, HttpProvider, ProviderSlot, SessionView,
    TokenBalances, TracingNotifier, WalletSession, Web3BalanceReader,
};

#[derive(Parser)]
#[command(name = "walletctl", version, about = "Inspect wallet session and token balances")]
struct Cli {
    /// Settings file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint the session connects through
    #[arg(long)]
    rpc_url: Option<String>,

    /// Watch-only account reported by the provider
    #[arg(long)]
    account: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect and print the session snapshot
    Status,
    /// Connect and fetch the tracked token set
    Balances,
    /// Connect and read one token contract
    Token {
        #[arg(long)]
        contract: String,
    },
    /// Print the effective settings
    Settings,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = WalletSettings::load(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Command::Settings = cli.command {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let url = cli
        .rpc_url
        .clone()
        .unwrap_or_else(|| settings.rpc.default_url.clone());

    let mut provider = HttpProvider::new(&url)
        .with_context(|| format!("Failed to create provider for {}", url))?
        .flagged_as_metamask();
    if let Some(account) = &cli.account {
        provider = provider.with_accounts(vec![account.clone()]);
    }

    let slot = ProviderSlot::with_provider(Arc::new(provider));
    let registry = Arc::new(AdapterRegistry::new(slot));
    let session = WalletSession::new(registry, Arc::new(TracingNotifier));

    session.init();
    session.connect(WalletId::MetaMask).await;

    let state = session.snapshot();
    if state.status == SessionStatus::Error {
        println!("{}", serde_json::to_string_pretty(&state)?);
        let reason = state
            .error_kind
            .map(|kind| kind.user_message())
            .unwrap_or("unknown error");
        bail!("Session failed to connect: {}", reason);
    }

    info!(
        account = state.account.as_deref().unwrap_or("-"),
        network = chain_name(state.chain_id),
        "Session ready"
    );

    // The session endpoint also serves balance reads on its chain
    if let (Some(rpc_url), Some(chain_id)) = (&cli.rpc_url, state.chain_id) {
        settings
            .rpc
            .endpoints
            .insert(chain_id.to_string(), rpc_url.clone());
    }
    let settings = Arc::new(settings);
    let reader = Arc::new(Web3BalanceReader::new(settings.balances.fallback_decimals));
    let account = state.account.clone().unwrap_or_default();

    match cli.command {
        Command::Status => {
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Command::Balances => {
            let balances = TokenBalances::new(reader, settings);
            let outcome = balances.refresh(&account, state.chain_id).await;
            report(outcome)?;
            println!("{}", serde_json::to_string_pretty(&balances.snapshot())?);
        }
        Command::Token { contract } => {
            let view: Arc<dyn SessionView> = Arc::new(session.clone());
            let custom = CustomTokenBalance::new(reader, settings, view);
            custom.set_contract_address(contract);
            let outcome = custom.check_balance(&account, state.chain_id).await;
            report(outcome)?;
            println!("{}", serde_json::to_string_pretty(&custom.snapshot())?);
        }
        Command::Settings => {}
    }

    Ok(())
}

fn report(outcome: FetchOutcome) -> Result<()> {
    match outcome {
        FetchOutcome::Rejected(kind) => bail!("{}", kind.user_message()),
        other => {
            info!(?other, "Fetch finished");
            Ok(())
        }
    }
}
