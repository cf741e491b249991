//! bowerstatic - resolve component includes and publish them at cache-forever URLs.

mod cli;
mod config;

use anyhow::Result;
use bowerstatic::debug;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::BowerConfig;
use std::sync::Arc;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    cli::serve::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    bowerstatic::logger::set_verbose(cli.verbose);

    let config = Arc::new(BowerConfig::load(&cli)?);
    debug!("config"; "loaded {}", config.config_path.display());
    let bower = config.build_bower()?;

    match &cli.command {
        Commands::Serve { .. } => cli::serve::serve(Arc::clone(&config), bower),
        Commands::Resolve { collection, specs } => {
            cli::resolve::run(&bower, &config, collection.as_deref(), specs)
        }
        Commands::List => cli::list::run(&bower),
    }
}
