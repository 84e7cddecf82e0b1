//! deltapi command line runner
//!
//! Loads action files, replays them against server A and server B, logs one
//! status line per action and optionally writes the JSON report.

mod args;
mod interactive;

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use deltapi_core::{ActionReport, ReportStatus};
use deltapi_engine::{read_all, save_report, Engine};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.run_config()?;
    info!(server_a = %config.server_a, server_b = %config.server_b, "Starting deltapi");

    let actions = read_all(&cli.files).context("failed to load actions")?;
    if actions.is_empty() {
        warn!("No actions to run");
    }

    let engine = Engine::from_config(&config).context("failed to create HTTP clients")?;
    let control = engine.control();
    interactive::spawn_stdin_control(control.clone());
    let ctrl_c = interactive::spawn_ctrl_c_stop(control);

    let report = engine.run_all(&actions, log_status).await?;
    ctrl_c.abort();

    let summary = report.summary();
    let total_ms = report.total_time().num_milliseconds();
    info!("Run finished in {} ms: {}", total_ms, summary);

    if let Some(path) = &cli.report {
        save_report(&report, path)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    if summary.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn log_status(_index: usize, report: &ActionReport) {
    let status = report.status();
    if !status.is_terminal() {
        return;
    }

    let action = report.action();
    if status == ReportStatus::Failure {
        warn!(target: "status", "[{:<7}] {:<7} {}", status, action.verb(), action.url());
    } else {
        info!(target: "status", "[{:<7}] {:<7} {}", status, action.verb(), action.url());
    }
}
