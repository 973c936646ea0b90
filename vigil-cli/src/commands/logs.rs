//! Logs command handler

use anyhow::{Context, Result};
use colored::*;
use vigil_client::StatusClient;
use vigil_core::domain::LogLine;
use vigil_core::status::is_error_line;

use crate::config::Config;

/// Show the logs of one process, newest first
pub async fn show_logs(config: &Config, name: &str, limit: usize) -> Result<()> {
    let client = StatusClient::new(&config.server_url);
    let status = client
        .get_status(name)
        .await
        .with_context(|| format!("Failed to fetch status of {}", name))?;

    if status.logs.is_empty() {
        println!("{}", format!("No logs for {}.", name).yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Showing {} of {} line(s) for {}:",
            status.logs.len().min(limit),
            status.logs.len(),
            name
        )
        .bold()
    );
    println!();
    for line in status.logs.iter().take(limit) {
        print_log_line(line);
    }

    Ok(())
}

fn print_log_line(line: &LogLine) {
    let timestamp = line.timestamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string();
    let message = if is_error_line(&line.message) {
        line.message.red()
    } else {
        line.message.normal()
    };

    println!("  {} {}", timestamp.dimmed(), message);
}
