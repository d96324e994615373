//! XIRR command implementation.
//!
//! Reads `date,amount` cash flows and solves for the money-weighted return.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use perfcalc_analytics::inputs::read_cashflow_csv;
use perfcalc_analytics::xirr::XirrSolver;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output::{print_json_value, print_output, print_warning, KeyValue};

/// Arguments for the xirr command.
#[derive(Args, Debug)]
pub struct XirrArgs {
    /// CSV file with `date,amount` columns (YYYY-MM-DD dates)
    #[arg(long)]
    pub file: PathBuf,

    /// Starting guess as a fraction (e.g. 0.1 for 10%)
    #[arg(short, long, allow_hyphen_values = true)]
    pub guess: Option<f64>,
}

/// Execute the xirr command.
pub fn execute(args: XirrArgs, format: OutputFormat) -> Result<()> {
    let flows = read_cashflow_csv(&args.file).map_err(CliError::from)?;
    tracing::info!(flows = flows.len(), file = %args.file.display(), "solving xirr");

    let result = XirrSolver::new().solve_detailed(&flows, args.guess);

    if result.is_none() {
        print_warning("no rate found: cash flows need both signs, or no guess converged");
    }

    match format {
        OutputFormat::Json => print_json_value(&result),
        OutputFormat::Minimal => {
            match result {
                Some(r) => println!("{}", r.rate_pct),
                None => println!("null"),
            }
            Ok(())
        }
        OutputFormat::Table | OutputFormat::Csv => {
            let mut rows = vec![
                KeyValue::new("Cash Flows", flows.len().to_string()),
                KeyValue::new("Net Amount", format!("{:.2}", flows.total())),
                KeyValue::from_value("XIRR (%)", result.map(|r| r.rate_pct), 6),
            ];
            if let Some(r) = result {
                rows.push(KeyValue::new("Starting Guess", r.guess.to_string()));
                rows.push(KeyValue::new("Iterations", r.iterations.to_string()));
            }
            print_output(&rows, format)
        }
    }
}
