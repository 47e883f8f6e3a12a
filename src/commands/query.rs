//! `aerowatch query` — query a running aerowatch daemon via its REST API.

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;

use crate::client::AeroWatchClient;
use crate::config;

use super::output;

#[derive(Subcommand)]
pub enum QueryCommands {
    /// Daemon health check
    Health,
    /// Alerts from the latest poll
    Alerts,
    /// Force a poll and show the new alerts
    Refresh,
    /// Fleet summary (per-status counts)
    Summary,
    /// Active alert engine configuration
    Config,
}

pub fn run(
    config_path: Option<&Path>,
    url: Option<&str>,
    format: &str,
    command: &QueryCommands,
) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_async(config_path, url, format, command))
}

async fn run_async(
    config_path: Option<&Path>,
    url: Option<&str>,
    format: &str,
    command: &QueryCommands,
) -> Result<()> {
    let client = match url {
        Some(u) => AeroWatchClient::new(u)?,
        None => {
            let cfg = config::load(config_path)?;
            AeroWatchClient::for_addr(&cfg.daemon.http_addr)?
        }
    };

    match command {
        QueryCommands::Health => {
            let data = client.health().await?;
            output::print_output(format, &data)
        }
        QueryCommands::Alerts => {
            let data = client.alerts().await?;
            output::print_report(format, &data)
        }
        QueryCommands::Refresh => {
            let data = client.refresh().await?;
            output::print_report(format, &data)
        }
        QueryCommands::Summary => {
            let data = client.summary().await?;
            output::print_output(format, &data)
        }
        QueryCommands::Config => {
            let data = client.engine_config().await?;
            output::print_output(format, &data)
        }
    }
}
