//! `ollama-probe status` — every check, no short-circuit.

use anyhow::Result;
use colored::Colorize;

use super::{print_check, print_json, OutputFormat};
use crate::domain::probe::DiagnosticProbe;

pub fn run(probe: &DiagnosticProbe, format: OutputFormat) -> Result<()> {
    let status = probe.get_detailed_status();

    match format {
        OutputFormat::Json => print_json(&status)?,
        OutputFormat::Table => {
            println!("{}", "═══ Server Status ═══".cyan().bold());
            println!("  Base address:  {}", status.base_address.bold());
            println!("  Timeout:       {}s", status.request_timeout_secs);
            println!(
                "  Location:      {}",
                if status.is_local { "local" } else { "remote" }
            );
            println!("  Checked at:    {}", status.timestamp.to_rfc3339());
            println!();
            for (name, result) in &status.tests {
                print_check(name, result);
            }
        }
    }
    Ok(())
}
