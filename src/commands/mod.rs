pub mod check;
pub mod config;
pub mod diagnose;
pub mod status;

use anyhow::{bail, Result};
use colored::Colorize;
use std::fmt;
use std::str::FromStr;

use crate::domain::types::CheckResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => bail!("unknown format '{}' (expected 'table' or 'json')", other),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

fn print_json<T: serde::Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{}", json);
    Ok(())
}

fn print_check(label: &str, result: &CheckResult) {
    let icon = if result.available {
        "ok".green().bold()
    } else {
        "!!".red().bold()
    };
    println!("  {} {:<14} {}", icon, label, result.message);
}

/// Print a single check in the requested format and exit non-zero on failure.
fn finish_check(format: OutputFormat, label: &str, result: &CheckResult) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(result)?,
        OutputFormat::Table => print_check(label, result),
    }
    if !result.available {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert!("yaml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
