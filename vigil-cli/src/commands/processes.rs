//! Processes command handler

use anyhow::{Context, Result};
use colored::*;
use vigil_client::StatusClient;

use crate::config::Config;

/// List the monitored processes
pub async fn list_processes(config: &Config) -> Result<()> {
    let client = StatusClient::new(&config.server_url);
    let processes = client
        .list_processes()
        .await
        .context("Failed to fetch process list")?;

    println!("{}", "Flat processes:".bold());
    for name in &processes.flat {
        println!("  {} {}", "▸".cyan(), name);
    }

    println!();
    println!("{}", "Publisher sub-runs:".bold());
    for name in &processes.sub_runs {
        println!("  {} {}", "▸".cyan(), name);
    }

    Ok(())
}
