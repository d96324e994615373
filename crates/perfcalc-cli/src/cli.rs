//! CLI argument definitions.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::commands::{RatioArgs, XirrArgs};

/// Perfcalc - Investment performance analytics CLI
#[derive(Parser)]
#[command(name = "perfcalc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Money-weighted annual return (XIRR) of dated cash flows
    Xirr(XirrArgs),

    /// Rolling risk and performance ratio of a NAV series
    Ratio(RatioArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the value)
    Minimal,
}
