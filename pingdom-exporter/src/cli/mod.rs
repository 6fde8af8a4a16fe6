//! CLI module for pingdom-exporter
//!
//! Provides the command-line interface of the exporter.

pub mod server;

use clap::{CommandFactory, Parser, Subcommand};

/// Pingdom exporter - Republishes Pingdom check status as Prometheus metrics
#[derive(Parser, Debug)]
#[command(name = "pingdom-exporter")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    PINGDOM_EXPORTER_HOST        Bind address (default: 0.0.0.0)
    PINGDOM_EXPORTER_PORT        Listen port (default: 8000)
    PINGDOM_EXPORTER_WAIT        Seconds between Pingdom API calls (default: 10)
    PINGDOM_API_URL              Pingdom API base URL (default: https://api.pingdom.com)
    PINGDOM_EXPORTER_LOG_LEVEL   Log level (default: info)
    PINGDOM_EXPORTER_LOG_FORMAT  Log format: text or json (default: text)
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Server(server::ServerArgs),
}

/// Print the help of a subcommand (or the root command when not found)
pub fn print_subcommand_help(name: &str) -> std::io::Result<()> {
    let mut command = Cli::command();
    command.build();
    match command.find_subcommand_mut(name) {
        Some(subcommand) => subcommand.print_help(),
        None => command.print_help(),
    }
}
