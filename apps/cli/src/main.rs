//! # Mostrador CLI
//!
//! Counter tools over the Mostrador backend: identifier assignment, the
//! price form, pending sales, stock, the daily cash count and the sales
//! dashboard.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  args (clap) ──► AppState ──┬──► ApiClient ──► backend /api/*           │
//! │                 (config)    ├──► Database  ──► local SQLite             │
//! │                             └──► mostrador-core (pure logic)            │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                               Output (text or --json)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Logging
//! Logs go to stderr. `-v` enables info, `-vv` debug; `RUST_LOG` overrides
//! both (`RUST_LOG=mostrador_client=debug`).

mod commands;
mod output;
mod parse;
mod state;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::commands::{cash, catalog, config, dashboard, price, sales, stock};
use crate::output::Output;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "mostrador", version, about = "Counter tools for the Mostrador backend")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "MOSTRADOR_CONFIG")]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show or create the configuration file
    #[command(subcommand)]
    Config(config::ConfigCommand),

    /// List the product types of the catalog
    Types,

    /// Assign an identifier from a product type and a price
    Assign(catalog::AssignArgs),

    /// Reconcile list price, discount and final price
    Price(price::PriceArgs),

    /// Pending (not yet exported) sales
    #[command(subcommand)]
    Sales(sales::SalesCommand),

    /// Stock levels, reorder points and ingresses
    #[command(subcommand)]
    Stock(stock::StockCommand),

    /// Daily cash count (opening / closing)
    Cash(cash::CashArgs),

    /// Sales totals over a date range
    Dashboard(dashboard::DashboardArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let out = Output::new(cli.json);
    let config_path = cli.config;

    match cli.command {
        Command::Config(cmd) => config::run(cmd, config_path, &out),
        Command::Price(args) => price::run(&args, &out),
        Command::Types => catalog::types(&AppState::load(config_path)?, &out).await,
        Command::Assign(args) => catalog::assign(&AppState::load(config_path)?, &args, &out).await,
        Command::Sales(cmd) => sales::run(&AppState::load(config_path)?, cmd, &out).await,
        Command::Stock(cmd) => stock::run(&AppState::load(config_path)?, cmd, &out).await,
        Command::Cash(args) => cash::run(&AppState::load(config_path)?, &args, &out).await,
        Command::Dashboard(args) => dashboard::run(&AppState::load(config_path)?, &args, &out).await,
    }
}

/// Initializes the tracing subscriber on stderr.
///
/// `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info,sqlx=warn",
        _ => "debug,sqlx=info,hyper=info,reqwest=info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
