//! Status command handler
//!
//! Prints one line per process. A process without logs is shown apart from
//! one whose logs contain an error.

use anyhow::{Context, Result};
use colored::*;
use vigil_client::StatusClient;
use vigil_core::domain::{ProcessName, ProcessStatus};

use crate::config::Config;

/// Show the status of every process
pub async fn show_statuses(config: &Config, failing_only: bool) -> Result<()> {
    let client = StatusClient::new(&config.server_url);
    let statuses = client
        .get_statuses()
        .await
        .context("Failed to fetch process statuses")?;

    let shown: Vec<(&ProcessName, &ProcessStatus)> = statuses
        .iter()
        .filter(|(_, status)| !failing_only || needs_attention(status))
        .collect();

    if shown.is_empty() {
        println!("{}", "All processes are healthy.".green());
        return Ok(());
    }

    println!("{}", format!("{} process(es):", shown.len()).bold());
    println!();
    for (name, status) in shown {
        print_status_line(name, status);
    }

    Ok(())
}

fn needs_attention(status: &ProcessStatus) -> bool {
    !status.success || status.is_late
}

fn print_status_line(name: &ProcessName, status: &ProcessStatus) {
    let late = if status.is_late {
        "late".yellow().to_string()
    } else {
        String::new()
    };

    let last_run = status
        .last_run
        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    println!(
        "  {} {:<16} {:<10} {:<5} {}",
        "▸".cyan(),
        name.as_str().bold(),
        outcome(status),
        late,
        last_run.dimmed()
    );
}

/// Colorized outcome label of a status
fn outcome(status: &ProcessStatus) -> ColoredString {
    match outcome_label(status) {
        label @ "ok" => label.green(),
        label @ "no logs" => label.dimmed(),
        label => label.red(),
    }
}

fn outcome_label(status: &ProcessStatus) -> &'static str {
    if status.has_no_logs() {
        "no logs"
    } else if status.success {
        "ok"
    } else {
        "errored"
    }
}
