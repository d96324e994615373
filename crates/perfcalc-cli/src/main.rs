//! Perfcalc CLI - Command-line interface for investment performance analytics.
//!
//! # Usage
//!
//! ```bash
//! # Money-weighted return of a cash-flow file (date,amount)
//! perfcalc xirr --file flows.csv
//!
//! # Latest one-year sharpe ratio against a benchmark (date,nav files)
//! perfcalc ratio sharpe --nav fund.csv --benchmark index.csv --window 250
//!
//! # Full drawdown column as JSON
//! perfcalc --format json ratio drawdown --nav fund.csv --window 60 --series
//!
//! # Engine settings from a TOML file
//! perfcalc ratio sortino --nav fund.csv --config ratios.toml
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let format = cli.format;

    match cli.command {
        Commands::Xirr(args) => commands::xirr::execute(args, format)?,
        Commands::Ratio(args) => commands::ratio::execute(args, format)?,
    }

    Ok(())
}

/// Logs go to stderr so that stdout stays machine-readable.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "perfcalc=info,perfcalc_analytics=info",
        2 => "perfcalc=debug,perfcalc_analytics=debug,perfcalc_math=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
