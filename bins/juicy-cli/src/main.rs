//! juicy-cli — Command-line simulator for the Juicy ledger.
//!
//! Keeps a ledger in a local state file and drives it with a simulated
//! clock: create a ledger, move time forward, transfer, mark addresses as
//! contracts, and inspect balances and global totals.

mod session;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use juicy_core::address::Address;
use juicy_core::amount::{Amount, format_amount, parse_amount};
use juicy_core::constants::{BPS_PRECISION, NetworkType};
use juicy_core::traits::{AccountClassifier, Clock};
use juicy_core::types::LedgerEvent;
use juicy_ledger::{CodeRegistry, Ledger, LedgerConfig, ManualClock, SystemClock};
use tracing::info;

use crate::session::Session;

/// Juicy ledger simulator.
#[derive(Parser)]
#[command(name = "juicy-cli")]
#[command(version, about = "Simulate a Juicy ledger over accelerated time.")]
struct Cli {
    /// State file (default: <data dir>/juicy/<network>/ledger.bin).
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Use the testnet preset and data directory.
    #[arg(long, global = true)]
    testnet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new ledger and credit the initial supply to the creator.
    Init(InitArgs),
    /// Move the simulated clock forward.
    Warp(WarpArgs),
    /// Transfer tokens between two addresses.
    Transfer(TransferArgs),
    /// Set an allowance.
    Approve(ApproveArgs),
    /// Transfer on behalf of an owner using an allowance.
    TransferFrom(TransferFromArgs),
    /// Mark an address as having deployed code (or clear the mark).
    MarkContract(MarkContractArgs),
    /// Show realized and pending balance of an address.
    Balance(BalanceArgs),
    /// Show global ledger totals.
    Status(StatusArgs),
}

#[derive(Args)]
struct InitArgs {
    /// Creator address receiving the initial supply.
    #[arg(long, default_value = "0x0101010101010101010101010101010101010101")]
    creator: Address,

    /// TOML file overriding the network preset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Genesis time in unix seconds (default: now).
    #[arg(long)]
    start: Option<u64>,

    /// Overwrite an existing state file.
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct WarpArgs {
    /// Seconds to advance.
    seconds: u64,
}

#[derive(Args)]
struct TransferArgs {
    #[arg(long)]
    from: Address,
    #[arg(long)]
    to: Address,
    /// Amount in tokens (e.g. 1000 or 0.25).
    #[arg(long)]
    amount: String,
}

#[derive(Args)]
struct ApproveArgs {
    #[arg(long)]
    owner: Address,
    #[arg(long)]
    spender: Address,
    /// Amount in tokens, or "unlimited".
    #[arg(long)]
    amount: String,
}

#[derive(Args)]
struct TransferFromArgs {
    #[arg(long)]
    spender: Address,
    #[arg(long)]
    from: Address,
    #[arg(long)]
    to: Address,
    /// Amount in tokens.
    #[arg(long)]
    amount: String,
}

#[derive(Args)]
struct MarkContractArgs {
    address: Address,
    /// Remove the mark instead.
    #[arg(long)]
    remove: bool,
}

#[derive(Args)]
struct BalanceArgs {
    address: Address,
}

#[derive(Args)]
struct StatusArgs {
    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    let network = if cli.testnet {
        NetworkType::Testnet
    } else {
        NetworkType::Mainnet
    };
    let state_path = match cli.state {
        Some(p) => p,
        None => default_state_path(network)?,
    };

    match cli.command {
        Commands::Init(args) => init(args, network, &state_path),
        Commands::Warp(args) => with_session(&state_path, |s| warp(s, args)),
        Commands::Transfer(args) => with_session(&state_path, |s| transfer(s, args)),
        Commands::Approve(args) => with_session(&state_path, |s| approve(s, args)),
        Commands::TransferFrom(args) => with_session(&state_path, |s| transfer_from(s, args)),
        Commands::MarkContract(args) => with_session(&state_path, |s| mark_contract(s, args)),
        Commands::Balance(args) => balance(&Session::load(&state_path)?, args),
        Commands::Status(args) => status(&Session::load(&state_path)?, args),
    }
}

/// Load the session, run a mutating command, save the session.
fn with_session(path: &Path, f: impl FnOnce(&mut Session) -> Result<()>) -> Result<()> {
    let mut session = Session::load(path)?;
    f(&mut session)?;
    print_events(&mut session.ledger);
    session.save(path)
}

fn init(args: InitArgs, network: NetworkType, path: &Path) -> Result<()> {
    if path.exists() && !args.force {
        bail!(
            "State file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    let config = LedgerConfig::load(args.config.as_deref(), network)
        .context("Invalid ledger configuration")?;
    let start = args.start.unwrap_or_else(|| SystemClock.now());
    let clock = Arc::new(ManualClock::new(start));
    let registry = Arc::new(CodeRegistry::new());
    let ledger = Ledger::genesis(config, args.creator, registry.clone(), clock.clone())
        .context("Genesis failed")?;

    info!(state = %path.display(), ?network, "ledger created");
    println!(
        "Created {} ({}) ledger: {} {} credited to {}",
        ledger.name(),
        ledger.symbol(),
        format_amount(ledger.initial_supply()),
        ledger.symbol(),
        args.creator
    );

    let mut session = Session::new(ledger, clock, registry);
    print_events(&mut session.ledger);
    session.save(path)
}

fn warp(session: &mut Session, args: WarpArgs) -> Result<()> {
    session.clock.advance(args.seconds);
    println!("Clock now at {}", session.clock.now());
    Ok(())
}

fn transfer(session: &mut Session, args: TransferArgs) -> Result<()> {
    let amount = parse_tokens(&args.amount)?;
    let receipt = session
        .ledger
        .transfer(args.from, args.to, amount)
        .context("Transfer failed")?;
    println!(
        "Multiplier {} -> {}",
        format_multiplier(receipt.multiplier_before),
        format_multiplier(receipt.multiplier_after)
    );
    Ok(())
}

fn approve(session: &mut Session, args: ApproveArgs) -> Result<()> {
    let amount = if args.amount.eq_ignore_ascii_case("unlimited") {
        Amount::MAX
    } else {
        parse_tokens(&args.amount)?
    };
    session
        .ledger
        .approve(args.owner, args.spender, amount)
        .context("Approve failed")
}

fn transfer_from(session: &mut Session, args: TransferFromArgs) -> Result<()> {
    let amount = parse_tokens(&args.amount)?;
    session
        .ledger
        .transfer_from(args.spender, args.from, args.to, amount)
        .context("Transfer failed")?;
    println!(
        "Remaining allowance: {}",
        format_allowance(session.ledger.allowance(&args.from, &args.spender))
    );
    Ok(())
}

fn mark_contract(session: &mut Session, args: MarkContractArgs) -> Result<()> {
    if args.remove {
        if !session.registry.destroy(&args.address) {
            bail!("{} is not marked as a contract", args.address);
        }
        println!("{} is now a wallet (reclassified at its next transfer)", args.address);
    } else {
        if !session.registry.deploy(args.address) {
            bail!("{} is already marked as a contract", args.address);
        }
        println!("{} is now a contract (reclassified at its next transfer)", args.address);
    }
    Ok(())
}

fn balance(session: &Session, args: BalanceArgs) -> Result<()> {
    let ledger = &session.ledger;
    let realized = ledger.balance_of(&args.address);
    let pending = ledger
        .pending_balance_of(&args.address)
        .context("Pending balance query failed")?;
    let kind = session.registry.classify(&args.address);

    println!("Address:  {}", args.address);
    println!("Kind:     {kind:?}");
    println!("Balance:  {} {}", format_amount(realized), ledger.symbol());
    println!("Pending:  {} {}", format_amount(pending), ledger.symbol());
    Ok(())
}

fn status(session: &Session, args: StatusArgs) -> Result<()> {
    let ledger = &session.ledger;
    if args.json {
        let value = serde_json::json!({
            "name": ledger.name(),
            "symbol": ledger.symbol(),
            "decimals": ledger.decimals(),
            "now": ledger.now(),
            "initial_supply": format_amount(ledger.initial_supply()),
            "maximum_total_supply": format_amount(ledger.maximum_total_supply()),
            "total_supply": format_amount(ledger.total_supply()),
            "wallet_balances_sum": format_amount(ledger.wallet_balances_sum()),
            "distributed_rewards": format_amount(ledger.distributed_rewards()),
            "remaining_pool": format_amount(ledger.remaining_pool()),
            "initial_multiplier": ledger.initial_multiplier(),
            "current_multiplier": ledger.current_multiplier(),
            "accounts": ledger.account_count(),
            "contracts": session.registry.addresses(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("=== {} ({}) ===", ledger.name(), ledger.symbol());
    println!("Clock:               {}", ledger.now());
    println!("Total supply:        {}", format_amount(ledger.total_supply()));
    println!("Maximum supply:      {}", format_amount(ledger.maximum_total_supply()));
    println!("Wallet balances:     {}", format_amount(ledger.wallet_balances_sum()));
    println!("Distributed rewards: {}", format_amount(ledger.distributed_rewards()));
    println!("Remaining pool:      {}", format_amount(ledger.remaining_pool()));
    println!("Multiplier:          {}", format_multiplier(ledger.current_multiplier()));
    println!("Accounts:            {}", ledger.account_count());
    println!("Contracts:           {}", session.registry.len());
    Ok(())
}

fn print_events(ledger: &mut Ledger) {
    for event in ledger.take_events() {
        match event {
            LedgerEvent::Transfer { from, to, amount } => {
                println!("Transfer  {from} -> {to}: {}", format_amount(amount));
            }
            LedgerEvent::Approval {
                owner,
                spender,
                amount,
            } => {
                println!("Approval  {owner} -> {spender}: {}", format_allowance(amount));
            }
            LedgerEvent::RewardsRealized { account, amount } => {
                println!("Realized  {account}: +{}", format_amount(amount));
            }
        }
    }
}

fn parse_tokens(s: &str) -> Result<Amount> {
    parse_amount(s).with_context(|| format!("Invalid amount: {s}"))
}

fn format_allowance(amount: Amount) -> String {
    if amount == Amount::MAX {
        "unlimited".to_string()
    } else {
        format_amount(amount)
    }
}

/// `15000` -> `"1.5000x"`.
fn format_multiplier(m: u64) -> String {
    format!("{}.{:04}x", m / BPS_PRECISION, m % BPS_PRECISION)
}

fn default_state_path(network: NetworkType) -> Result<PathBuf> {
    let base = dirs::data_dir().context("Could not determine data directory")?;
    Ok(base
        .join("juicy")
        .join(network.data_dir_suffix())
        .join("ledger.bin"))
}

/// Logs go to stderr so command output on stdout stays clean. `RUST_LOG`
/// takes precedence over `--log-level`.
fn init_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .init(),
    }
}
