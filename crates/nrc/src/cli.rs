//! Command line interface
//!
//! Every command loads configuration the same way an application does
//! (defaults, then the TOML file, then `NRC_` environment variables) and
//! writes its result to stdout. Logs go to stderr.

use crate::domain::error::Result;
use crate::domain::value_objects::ServiceName;
use crate::infrastructure::ClientContextBuilder;
use crate::infrastructure::config::loader::to_toml;
use crate::infrastructure::config::{AppConfig, ConfigLoader};
use crate::infrastructure::logging::init_logging;
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::debug;

/// Command line interface for nrc
#[derive(Parser, Debug)]
#[command(name = "nrc")]
#[command(about = "Inspect and resolve named, load-balanced RPC clients")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List configured services with their servers
    Services,
    /// Build the load-balanced client for a service and print the server it picks
    Resolve {
        /// Service name as used in `[clients.<name>]`
        service: String,
        /// Number of servers to pick in a row
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Print the merged configuration as TOML
    Config,
}

/// Execute `cli`
pub fn run(cli: &Cli) -> Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load()?;
    init_logging(config.logging.clone())?;
    debug!(command = ?cli.command, "Running command");

    let output = render(&cli.command, config)?;
    print!("{output}");
    Ok(())
}

/// Produce the stdout text of `command`
pub fn render(command: &Command, config: AppConfig) -> Result<String> {
    match command {
        Command::Services => Ok(render_services(&config)),
        Command::Resolve { service, count } => render_resolve(config, service, *count),
        Command::Config => to_toml(&config),
    }
}

fn render_services(config: &AppConfig) -> String {
    if config.clients.is_empty() {
        return "no services configured\n".to_string();
    }
    let mut out = String::new();
    for (name, settings) in &config.clients {
        let _ = writeln!(out, "{name}\t{}", settings.servers.join(", "));
    }
    out
}

fn render_resolve(config: AppConfig, service: &str, count: usize) -> Result<String> {
    let service = ServiceName::new(service)?;
    let context = ClientContextBuilder::new(config).build()?;
    let client = context.resolve(service.as_str())?;

    let mut out = String::new();
    for _ in 0..count.max(1) {
        let server = client.choose()?;
        let url = client.reconstruct_url(&server, &format!("http://{service}/"))?;
        let _ = writeln!(out, "{service} -> {server} ({url})");
    }
    context.shutdown();
    Ok(out)
}
