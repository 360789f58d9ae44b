use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Faultline error rendering
#[derive(Debug, Parser)]
#[command(name = "faultline", about = "Validate error handling config and preview rendered errors")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "faultline.toml", env = "FAULTLINE_CONFIG")]
    pub config: PathBuf,

    /// Override the configured log filter
    #[arg(long, global = true, env = "FAULTLINE_LOG")]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load and validate the configuration
    Check,
    /// Render the error response a fault would produce
    Render(RenderArgs),
}

#[derive(Debug, clap::Args)]
pub struct RenderArgs {
    /// Dotted fault kind, e.g. `resource.not_found.user`
    #[arg(long)]
    pub kind: String,

    /// Fault message
    #[arg(long, default_value = "")]
    pub message: String,

    /// Status carried by the fault itself
    #[arg(long)]
    pub status: Option<u16>,

    /// Accept header sent by the client
    #[arg(long)]
    pub accept: Option<String>,

    /// Request path
    #[arg(long, default_value = "/")]
    pub uri: String,

    /// Name of the handler that raised the fault
    #[arg(long)]
    pub handler: Option<String>,

    /// Render as an include sub-request
    #[arg(long)]
    pub include: bool,
}
