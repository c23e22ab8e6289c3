//! `ollama-probe diagnose` — run the ordered diagnosis and explain the result.

use anyhow::Result;
use colored::Colorize;

use super::{print_check, print_json, OutputFormat};
use crate::domain::probe::DiagnosticProbe;
use crate::domain::types::{ConnectionStatus, DiagnosisReport};

pub fn run(probe: &DiagnosticProbe, format: OutputFormat) -> Result<()> {
    let report = probe.test_connection();

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => print_table(probe, &report),
    }

    if !report.status.is_connected() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_table(probe: &DiagnosticProbe, report: &DiagnosisReport) {
    println!("{}", "ollama-probe diagnose".bold());
    println!(
        "  server:  {} ({})",
        probe.base_url(),
        if probe.is_local() { "local" } else { "remote" }
    );
    println!("  model:   {}", probe.model());
    println!("  timeout: {}s", probe.timeout().as_secs_f64());
    println!();

    for (kind, result) in &report.details {
        print_check(&kind.to_string(), result);
    }

    println!();
    let status = report.status.to_string();
    let status = match report.status {
        ConnectionStatus::Connected => status.green().bold(),
        _ => status.red().bold(),
    };
    println!("  status:  {}", status);
    if let Some(hint) = report.status.hint() {
        println!("  hint:    {}", hint);
    }
}
