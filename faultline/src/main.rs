#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod preview;
mod telemetry;

use args::{Args, Command};
use clap::Parser;
use faultline_config::Config;
use faultline_handler::RestExceptionHandler;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    telemetry::init(&config.logging, args.log_filter.as_deref())?;

    tracing::debug!(config_path = %args.config.display(), "configuration loaded");

    let handler = RestExceptionHandler::from_config(&config)?;

    match args.command {
        Command::Check => {
            tracing::info!(
                mappings = config.resolver.mappings.len(),
                writers = config.writers.len(),
                default_writers = config.handler.default_writers,
                "configuration is valid"
            );
            println!("{}: ok", args.config.display());
        }
        Command::Render(ref render) => {
            print!("{}", preview::render(&handler, render)?);
        }
    }

    Ok(())
}
