//! Vigil CLI
//!
//! Command-line interface for checking process statuses on a Vigil server.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Lambda process status monitor", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(long, env = "VIGIL_SERVER_URL", default_value = "http://localhost:8080")]
    server_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        server_url: cli.server_url,
    };

    handle_command(cli.command, &config).await
}
