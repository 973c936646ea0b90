//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod logs;
mod processes;
mod status;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the status of every process
    Status {
        /// Only show processes that are failing or late
        #[arg(long)]
        failing: bool,
    },
    /// Show the logs of one process, newest first
    Logs {
        /// Process name, e.g. `fetcher` or `daily|bluesky`
        name: String,

        /// Maximum number of lines to print
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// List the monitored processes
    Processes,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Status { failing } => status::show_statuses(config, failing).await,
        Commands::Logs { name, limit } => logs::show_logs(config, &name, limit).await,
        Commands::Processes => processes::list_processes(config).await,
    }
}
