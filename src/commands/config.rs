//! `ollama-probe config` — print the effective configuration.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use super::{print_json, OutputFormat};
use crate::config::{ProbeConfig, ENV_PREFIX};

pub fn show(config: &ProbeConfig, path: Option<&Path>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(config),
        OutputFormat::Table => {
            let yaml = serde_yaml::to_string(config).context("serializing config")?;
            let path = match path {
                Some(p) => Some(p.to_path_buf()),
                None => ProbeConfig::path().ok(),
            };
            if let Some(path) = path {
                println!("{} {}", "# file:".dimmed(), path.display());
            }
            println!("{} {}*", "# env: ".dimmed(), ENV_PREFIX);
            print!("{}", yaml);
            Ok(())
        }
    }
}
