mod client;
mod commands;
mod config;
mod domain;
mod logging;
mod platform;
#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use commands::OutputFormat;
use domain::probe::DiagnosticProbe;

#[derive(Parser)]
#[command(
    name = "ollama-probe",
    version,
    about = "Diagnose why an Ollama server or its models cannot be reached"
)]
struct Cli {
    /// Path to config file (default: ~/.config/ollama-probe/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Server base URL (overrides config)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Seconds before any single request or ping is abandoned (overrides config)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Log level (overrides config, RUST_LOG wins over both)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Output format (table or json)
    #[arg(long, global = true, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the ordered diagnosis and report the most likely cause
    Diagnose {
        /// Model that must be loaded (overrides config)
        #[arg(long)]
        model: Option<String>,
    },

    /// Run every check and endpoint test without stopping early
    Status,

    /// Check that the server answers GET /api/tags
    Server,

    /// Check that a model is present on the server
    Model {
        /// Model name, matched exactly (defaults to the configured model)
        name: Option<String>,
    },

    /// Send a request to an API endpoint and classify the response
    Endpoint {
        /// Path relative to the base URL, e.g. /api/version
        path: String,

        /// HTTP method
        #[arg(long, default_value = "GET")]
        method: String,

        /// JSON request body
        #[arg(long)]
        data: Option<String>,
    },

    /// Ping a host (bare hostname or URL) with the system ping utility
    Ping {
        host: String,

        /// Number of echo requests (overrides config)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        count: Option<u32>,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let format: OutputFormat = cli.format.parse()?;

    let mut cfg = config::load(cli.config.as_deref())?;

    // CLI flags override config values
    if let Some(url) = cli.base_url {
        cfg.base_url = url;
    }
    if let Some(secs) = cli.timeout {
        cfg.timeout_secs = secs;
    }
    if let Some(level) = cli.log_level {
        cfg.log_level = level;
    }
    if let Commands::Diagnose { model: Some(model) } = &cli.command {
        cfg.model = model.clone();
    }

    logging::init(&cfg.log_level, cli.log_json);

    let probe = || {
        DiagnosticProbe::from_config(&cfg)
            .with_context(|| format!("configuring probe for {}", cfg.base_url))
    };

    match cli.command {
        Commands::Diagnose { .. } => commands::diagnose::run(&probe()?, format),
        Commands::Status => commands::status::run(&probe()?, format),
        Commands::Server => commands::check::server(&probe()?, format),
        Commands::Model { name } => commands::check::model(&probe()?, name.as_deref(), format),
        Commands::Endpoint { path, method, data } => {
            commands::check::endpoint(&probe()?, &path, &method, data.as_deref(), format)
        }
        Commands::Ping { host, count } => commands::check::ping(&probe()?, &host, count, format),
        Commands::Config => commands::config::show(&cfg, cli.config.as_deref(), format),
    }
}
