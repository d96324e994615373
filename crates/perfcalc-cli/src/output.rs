//! Output formatting utilities.

use colored::Colorize;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::cli::OutputFormat;

/// Formats and prints rows based on the specified format.
///
/// Minimal output prints the value column of the last row, which is the
/// most recent observation for date-ordered rows.
pub fn print_output<T: Serialize + Tabled + Valued>(
    data: &[T],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(data),
        OutputFormat::Csv => print_csv(data),
        OutputFormat::Minimal => {
            if let Some(last) = data.last() {
                println!("{}", last.value());
            }
            Ok(())
        }
    }
}

/// Prints any serializable value as pretty JSON.
pub fn print_json_value<T: Serialize>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as a formatted table.
fn print_table<T: Tabled>(data: &[T]) -> anyhow::Result<()> {
    if data.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
    Ok(())
}

/// Prints data as JSON.
fn print_json<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as CSV.
fn print_csv<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Formats an optional number, `-` when missing.
pub fn format_value(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.prec$}", v, prec = precision))
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// Rows that carry one principal value for minimal output.
pub trait Valued {
    /// The value to print in minimal mode.
    fn value(&self) -> &str;
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a key-value pair from an optional number.
    pub fn from_value(key: impl Into<String>, value: Option<f64>, precision: usize) -> Self {
        Self::new(key, format_value(value, precision))
    }
}

impl Valued for KeyValue {
    fn value(&self) -> &str {
        &self.value
    }
}

/// One dated row of a metric column.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct DatedValue {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl Valued for DatedValue {
    fn value(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some(1.234_567), 4), "1.2346");
        assert_eq!(format_value(None, 4), "-");
    }

    #[test]
    fn test_key_value() {
        let kv = KeyValue::from_value("Beta", Some(1.0), 2);
        assert_eq!(kv.key, "Beta");
        assert_eq!(kv.value(), "1.00");
    }
}
