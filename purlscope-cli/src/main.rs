//! purlscope -- command-line entry point
//!
//! Parses arguments, initialises logging from `[general]` and dispatches to
//! one handler per subcommand. Errors are printed to stderr and mapped to
//! exit codes by [`error::CliError::exit_code`].

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use purlscope_core::config::GeneralConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config errors are reported by the command handler; fall back to defaults for logging.
    let general = commands::load_config(&cli.config)
        .await
        .map(|c| c.general)
        .unwrap_or_else(|_| GeneralConfig::default());

    if let Err(e) = logging::init_tracing(&general, cli.log_level.as_deref()) {
        eprintln!("{} {e}", "error:".red().bold());
        return ExitCode::from(exit_byte(&e));
    }

    tracing::debug!(config = %cli.config.display(), "purlscope starting");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::from(exit_byte(&e))
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.format);
    match cli.command {
        Commands::Evinse(args) => commands::evinse::execute(args, &cli.config, &writer).await,
        Commands::Index(args) => commands::index::execute(args, &cli.config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}

fn exit_byte(err: &CliError) -> u8 {
    u8::try_from(err.exit_code()).unwrap_or(1)
}
