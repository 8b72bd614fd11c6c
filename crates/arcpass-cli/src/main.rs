//! arcpass CLI - finds passwords for encrypted archives and extracts them.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use progress::CliProgress;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);
    let show_progress = CliProgress::should_show(cli.quiet, cli.json);

    let (operation, result) = match &cli.command {
        cli::Commands::Match(args) => (
            "match",
            commands::matching::execute(args, &*formatter, show_progress),
        ),
        cli::Commands::Extract(args) => (
            "extract",
            commands::extract::execute(args, &*formatter, show_progress),
        ),
        cli::Commands::Completion { shell } => {
            commands::completion::execute(*shell);
            return Ok(());
        }
    };

    if let Err(e) = &result {
        formatter.format_error(operation, e);
    }
    result
}

/// Logs go to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,arcpass_cli=debug,arcpass_core=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
