//! Ratio command implementation.
//!
//! Computes one rolling metric of a NAV series, optionally against a
//! benchmark series or a risk-free rate.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use perfcalc_analytics::functions::DEFAULT_WINDOW;
use perfcalc_analytics::inputs::read_nav_csv;
use perfcalc_analytics::ratios::{Metric, MetricSeries, RatioConfig, RatioEngine};

use crate::cli::OutputFormat;
use crate::commands::load_ratio_config;
use crate::error::CliError;
use crate::output::{format_value, print_header, print_json_value, print_output, DatedValue, KeyValue};

/// Arguments for the ratio command.
#[derive(Args, Debug)]
pub struct RatioArgs {
    /// Metric: volatility, beta, alpha, treynor, sharpe, sortino, drawdown,
    /// upside-capture, downside-capture
    pub metric: String,

    /// CSV file with `date,nav` columns
    #[arg(long)]
    pub nav: PathBuf,

    /// Benchmark CSV file with `date,nav` columns
    #[arg(short, long)]
    pub benchmark: Option<PathBuf>,

    /// Annual risk-free rate as a fraction, used when no benchmark is given
    #[arg(short, long, allow_hyphen_values = true)]
    pub risk_free_rate: Option<f64>,

    /// Rolling window in rows
    #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
    pub window: usize,

    /// Return periods per year (default: 250)
    #[arg(short, long)]
    pub annualiser: Option<u32>,

    /// TOML file with `annualiser` and `risk_free_rate`
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the full column instead of the latest value
    #[arg(long)]
    pub series: bool,

    /// Decimal places in table and CSV output
    #[arg(long, default_value = "6")]
    pub precision: usize,
}

impl RatioArgs {
    /// Config file values, overridden by explicit flags.
    fn ratio_config(&self) -> Result<RatioConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => load_ratio_config(path)?,
            None => RatioConfig::default(),
        };
        if let Some(annualiser) = self.annualiser {
            config = config.with_annualiser(annualiser);
        }
        if let Some(rate) = self.risk_free_rate {
            config = config.with_risk_free_rate(rate);
        }
        Ok(config)
    }
}

/// Execute the ratio command.
pub fn execute(args: RatioArgs, format: OutputFormat) -> Result<()> {
    let metric = parse_metric(&args.metric)?;
    let config = args.ratio_config()?;

    let nav = read_nav_csv(&args.nav).map_err(CliError::from)?;
    let benchmark = args
        .benchmark
        .as_ref()
        .map(read_nav_csv)
        .transpose()
        .map_err(CliError::from)?;

    tracing::info!(
        %metric,
        window = args.window,
        rows = nav.len(),
        benchmark = benchmark.is_some(),
        "computing ratio"
    );

    let engine = RatioEngine::new(nav, benchmark, config).map_err(CliError::from)?;
    let column = engine
        .compute(metric, args.window)
        .map_err(CliError::from)?;

    if args.series {
        print_series(&column, format, args.precision)
    } else {
        print_tail(&engine, &column, metric, args.window, format, args.precision)
    }
}

fn parse_metric(name: &str) -> Result<Metric, CliError> {
    name.parse().map_err(|_| {
        let names: Vec<String> = Metric::ALL
            .iter()
            .map(|m| m.name().replace('_', "-"))
            .collect();
        CliError::UnknownMetric(name.to_string(), names.join(", "))
    })
}

fn print_series(column: &MetricSeries, format: OutputFormat, precision: usize) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json_value(column);
    }

    let rows: Vec<DatedValue> = column
        .points()
        .iter()
        .map(|p| DatedValue {
            date: p.date.to_string(),
            value: format_value(p.value, precision),
        })
        .collect();

    if format == OutputFormat::Table {
        print_header(column.name());
    }
    print_output(&rows, format)
}

fn print_tail(
    engine: &RatioEngine,
    column: &MetricSeries,
    metric: Metric,
    window: usize,
    format: OutputFormat,
    precision: usize,
) -> Result<()> {
    let last = column.points().last();

    match format {
        OutputFormat::Json => print_json_value(&serde_json::json!({
            "metric": metric,
            "window": window,
            "date": last.map(|p| p.date),
            "value": column.tail(),
        })),
        OutputFormat::Minimal => {
            match column.tail() {
                Some(value) => println!("{value}"),
                None => println!("null"),
            }
            Ok(())
        }
        OutputFormat::Table | OutputFormat::Csv => {
            let benchmark = match engine.benchmark_source() {
                Some(source) => format!("{source:?}").to_lowercase(),
                None => "none".to_string(),
            };
            let rows = vec![
                KeyValue::new("Metric", metric.to_string()),
                KeyValue::new("Window", window.to_string()),
                KeyValue::new("Annualiser", engine.config().annualiser.to_string()),
                KeyValue::new("Benchmark", benchmark),
                KeyValue::new(
                    "Date",
                    last.map_or_else(|| "-".to_string(), |p| p.date.to_string()),
                ),
                KeyValue::from_value("Value", column.tail(), precision),
            ];
            print_output(&rows, format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metric() {
        assert_eq!(parse_metric("upside-capture").unwrap(), Metric::UpsideCapture);
        let err = parse_metric("calmar").unwrap_err();
        assert!(err.to_string().contains("downside-capture"));
    }
}
