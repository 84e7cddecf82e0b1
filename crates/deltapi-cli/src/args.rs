//! Command line arguments

use anyhow::{Context, Result};
use clap::Parser;
use deltapi_config::RunConfig;
use std::path::PathBuf;

/// deltapi - replay recorded HTTP actions against two servers and compare the answers
#[derive(Debug, Parser)]
#[command(name = "deltapi")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Action file to replay (repeat to concatenate several files in order)
    #[arg(short = 'f', long = "file", required = true)]
    pub files: Vec<PathBuf>,

    /// Base URL of server A
    #[arg(short = 'a', long)]
    pub server_a: Option<String>,

    /// Base URL of server B
    #[arg(short = 'b', long)]
    pub server_b: Option<String>,

    /// Write the JSON report to this path
    #[arg(short = 'r', long)]
    pub report: Option<PathBuf>,

    /// YAML run configuration
    #[arg(short = 'c', long, env = "DELTAPI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Delay between two actions, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Pause the run when an action fails
    #[arg(long)]
    pub pause_after_failure: bool,

    /// Per-request timeout, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    /// Build the run configuration: file, then environment, then flags
    pub fn run_config(&self) -> Result<RunConfig> {
        let base = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?,
            None => RunConfig::new("", ""),
        };

        let config = base
            .apply_env()
            .context("invalid DELTAPI_* environment variable")?;
        let config = self.apply_flags(config);

        config.validate().context("invalid run configuration")?;
        Ok(config)
    }

    fn apply_flags(&self, mut config: RunConfig) -> RunConfig {
        if let Some(url) = &self.server_a {
            config.server_a = url.clone();
        }
        if let Some(url) = &self.server_b {
            config.server_b = url.clone();
        }
        if let Some(delay_ms) = self.delay_ms {
            config.delay_ms = delay_ms;
        }
        if self.pause_after_failure {
            config.pause_after_failure = true;
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = secs;
        }
        config
    }
}
