use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::alerts::engine::AlertEngineConfig;

/// Environment variable prefix. Nested keys use `__`, e.g.
/// `AEROWATCH_BACKEND__URL` or `AEROWATCH_ALERTS__THRESHOLDS__BATTERY_WARNING_PCT`.
const ENV_PREFIX: &str = "AEROWATCH_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub daemon: DaemonConfig,
    pub alerts: AlertEngineConfig,
}

/// Where the fleet CRUD backend lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
    pub drones_path: String,
    pub bases_path: String,
    pub routes_path: String,
    pub timeout_secs: u64,
    /// Sent as `Authorization: Bearer <token>` when set.
    pub token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8001".to_string(),
            drones_path: "/drones/".to_string(),
            bases_path: "/bases/".to_string(),
            routes_path: "/bases/routes/".to_string(),
            timeout_secs: 10,
            token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub http_addr: String,
    pub log_level: String,
    /// Seconds between snapshot polls. 0 disables polling.
    pub poll_interval_secs: u64,
    /// Browser origins allowed to call the API (the admin console).
    pub cors_origins: Vec<String>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            http_addr: "127.0.0.1:9300".to_string(),
            log_level: "info".to_string(),
            poll_interval_secs: 30,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(config_dir.join("aerowatch").join("config.yaml"))
    }

    /// Layer defaults, the YAML file and `AEROWATCH_*` env vars, then validate.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        self.alerts
            .validate()
            .context("invalid alert thresholds")?;
        if self.backend.url.trim().is_empty() {
            anyhow::bail!("backend.url must not be empty");
        }
        Ok(())
    }
}

/// Load config from `path`, or from the default location when `None`.
/// A missing file is not an error; defaults and env vars still apply.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::path()?,
    };
    let config: Config = Config::figment(&path)
        .extract()
        .with_context(|| format!("loading config from {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
