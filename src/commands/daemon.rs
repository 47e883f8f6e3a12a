use std::path::Path;

use anyhow::Result;

use crate::config;

pub fn run(
    config_path: Option<&Path>,
    http_addr: Option<String>,
    backend_url: Option<String>,
    poll_interval: Option<u64>,
    log_level: Option<String>,
) -> Result<()> {
    let mut cfg = config::load(config_path)?;

    // CLI flags override config values
    if let Some(addr) = http_addr {
        cfg.daemon.http_addr = addr;
    }
    if let Some(url) = backend_url {
        cfg.backend.url = url;
    }
    if let Some(secs) = poll_interval {
        cfg.daemon.poll_interval_secs = secs;
    }
    if let Some(level) = log_level {
        cfg.daemon.log_level = level;
    }

    // Build tokio runtime explicitly (no #[tokio::main] on fn main)
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(crate::server::run(cfg.daemon, cfg.backend, cfg.alerts))
}
