//! `aerowatch evaluate` — one-shot alert evaluation.
//!
//! Reads a snapshot file when `--file` is given, otherwise fetches the three
//! collections from the backend once.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::alerts::engine::evaluate;
use crate::backend::BackendClient;
use crate::config;
use crate::domain::alert_report::AlertReport;
use crate::domain::snapshot::FleetSnapshot;

use super::output;

pub fn run(
    config_path: Option<&Path>,
    file: Option<&Path>,
    backend_url: Option<String>,
    format: &str,
) -> Result<()> {
    let mut cfg = config::load(config_path)?;
    crate::logging::init("warn", false);

    if let Some(url) = backend_url {
        cfg.backend.url = url;
    }

    let snapshot = match file {
        Some(path) => FleetSnapshot::load(path)?,
        None => {
            let rt = tokio::runtime::Runtime::new()?;
            let client = BackendClient::new(cfg.backend.clone())
                .context("building backend client")?;
            rt.block_on(client.fetch_snapshot())
        }
    };

    let alerts = evaluate(&snapshot.drones, &snapshot.bases, &cfg.alerts);
    let report = AlertReport::new(&snapshot, alerts);
    info!(alerts = report.counts.total, checksum = %report.checksum, "evaluation complete");

    output::print_report(format, &report)
}
