//! propcc CLI - dependency-resolving compile driver for Propeller C

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging; stdout is reserved for command output
    let filter = if cli.global.verbose {
        EnvFilter::new("propcc=debug")
    } else {
        EnvFilter::new("propcc=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Compile(args) => commands::compile::execute(&cli.global, args),
        Commands::Deps(args) => commands::deps::execute(&cli.global, args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
