//! Single checks: `server`, `model`, `endpoint`, `ping`.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use super::{finish_check, print_check, print_json, OutputFormat};
use crate::domain::probe::DiagnosticProbe;
use crate::domain::types::{CheckResult, ConnectionStatus};

pub fn server(probe: &DiagnosticProbe, format: OutputFormat) -> Result<()> {
    let result = probe.check_server_availability();
    finish_check(format, "server", &result)
}

pub fn model(probe: &DiagnosticProbe, name: Option<&str>, format: OutputFormat) -> Result<()> {
    let name = name.unwrap_or_else(|| probe.model());
    let result = probe.check_model_status(name);
    finish_check(format, "model", &result)
}

pub fn ping(
    probe: &DiagnosticProbe,
    host: &str,
    count: Option<u32>,
    format: OutputFormat,
) -> Result<()> {
    let result = probe.ping_host(host, count.unwrap_or_else(|| probe.ping_count()));
    finish_check(format, "ping", &result)
}

#[derive(Serialize)]
struct EndpointReport<'a> {
    endpoint: &'a str,
    method: &'a str,
    status: ConnectionStatus,
    #[serde(flatten)]
    result: CheckResult,
}

pub fn endpoint(
    probe: &DiagnosticProbe,
    path: &str,
    method: &str,
    data: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let body = data
        .map(serde_json::from_str::<serde_json::Value>)
        .transpose()
        .context("--data is not valid JSON")?;

    let outcome = probe.probe_endpoint(path, method, body.as_ref());
    let report = EndpointReport {
        endpoint: path,
        method,
        status: outcome.status(),
        result: outcome.into(),
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            print_check(&format!("{} {}", method.to_uppercase(), path), &report.result);
            if !report.result.available {
                println!("  {:<17} {}", "status:".dimmed(), report.status);
                if let Some(hint) = report.status.hint() {
                    println!("  {:<17} {}", "hint:".dimmed(), hint);
                }
            }
        }
    }

    if !report.result.available {
        std::process::exit(1);
    }
    Ok(())
}
