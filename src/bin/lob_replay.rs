// ============================================================================
// lob-replay
// Loads listings, accounts and positions, replays an order file and prints
// the resulting books, trades, balances and fees
// ============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lob_engine::prelude::*;
use lob_engine::{ingest, report};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Fees {
    Standard,
    Zero,
}

#[derive(Parser)]
#[clap(name = "lob-replay")]
#[clap(about = "Replay an order stream through the limit order book exchange")]
struct Cli {
    /// Securities file (ticker,title)
    #[clap(long)]
    securities: PathBuf,

    /// Accounts file (title,trader_type,account_type,initial_balance)
    #[clap(long)]
    accounts: PathBuf,

    /// Initial positions file (trader_id,ticker,quantity)
    #[clap(long)]
    positions: Option<PathBuf>,

    /// Order stream (trader_id,ticker,type,quantity,price,time)
    #[clap(long)]
    orders: PathBuf,

    /// Fee schedule
    #[clap(long, value_enum, default_value = "standard")]
    fees: Fees,

    /// Omit table headers
    #[clap(long)]
    no_header: bool,

    /// Print book snapshots and the trade log as JSON
    #[clap(long)]
    json: bool,

    /// Price levels per side in JSON snapshots
    #[clap(long, default_value = "10")]
    depth: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let fee_schedule = match cli.fees {
        Fees::Standard => FeeSchedule::standard(),
        Fees::Zero => FeeSchedule::zero(),
    };
    let exchange = ExchangeBuilder::new()
        .fee_schedule(fee_schedule)
        .event_handler(Arc::new(LoggingEventHandler))
        .build()
        .context("invalid exchange configuration")?;

    let summary = ingest::load_securities(&exchange, ingest::open(&cli.securities)?)
        .with_context(|| format!("loading {}", cli.securities.display()))?;
    info!(?summary, "securities loaded");

    let summary = ingest::load_accounts(&exchange, ingest::open(&cli.accounts)?)
        .with_context(|| format!("loading {}", cli.accounts.display()))?;
    info!(?summary, "accounts loaded");

    if let Some(path) = &cli.positions {
        let summary = ingest::load_positions(&exchange, ingest::open(path)?)
            .with_context(|| format!("loading {}", path.display()))?;
        info!(?summary, "positions loaded");
    }

    let summary = ingest::load_orders(&exchange, ingest::open(&cli.orders)?)
        .with_context(|| format!("replaying {}", cli.orders.display()))?;
    info!(?summary, "orders replayed");

    if cli.json {
        println!("{}", report::snapshots_json(&exchange, cli.depth)?);
        println!("{}", report::trade_log_json(&exchange)?);
        return Ok(());
    }

    let header = !cli.no_header;
    print!("{}", report::ask_table(&exchange, header));
    print!("{}", report::bid_table(&exchange, header));
    print!("{}", report::trade_log(&exchange, header));
    print!("{}", report::balances(&exchange, header));
    print!("{}", report::fees_collected(&exchange, header));

    Ok(())
}
