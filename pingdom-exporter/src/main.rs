//! Pingdom exporter Entry Point

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use pingdom_exporter::cli::{print_subcommand_help, Cli, Commands};
use pingdom_exporter::error::ExporterError;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                e.exit();
            }
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    };

    match cli.command {
        Some(Commands::Server(args)) => {
            if let Err(e) = pingdom_exporter::cli::server::execute(&args).await {
                if let ExporterError::Usage(_) = e {
                    let _ = print_subcommand_help("server");
                } else {
                    eprintln!("Error: {}", e);
                }
                std::process::exit(1);
            }
        }
        None => {
            let _ = Cli::command().print_help();
        }
    }
}
