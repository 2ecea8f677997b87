//! BootstrapMe CLI - project scaffolding from presets
//!
//! This is the main entry point for the bootstrapme command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Some(Commands::New(args)) => commands::new::run(args, &cli.global).await,
        Some(Commands::List(args)) => commands::list::run(args, &cli.global),
        None => commands::wizard::run(&cli.global).await,
    }
}

/// Initialize tracing with appropriate verbosity
///
/// Engine progress is shown through the log view, so the default level is
/// `warn` to keep skipped-preset warnings visible without duplicating lines.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
