//! TeamPulse CLI
//!
//! Command-line interface for the synthetic environment: mode switching,
//! dataset management, identity simulation and hosting calls.

#![allow(clippy::print_stdout)]

mod app;
mod cli;
mod commands;

use clap::Parser;
use infrastructure::{AppConfig, init_tracing};

use crate::app::App;
use crate::cli::{Cli, log_filter_from_verbosity};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(&cli.config)?;
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.logging.filter = filter.to_string();
    }
    init_tracing(&config.logging)?;

    let app = App::build(&config)?;
    let output = commands::run(&app, &cli.session, cli.command).await?;
    println!("{output}");

    Ok(())
}
