//! Typed HTTP client for the aerowatch daemon REST API.

use anyhow::{bail, Context, Result};
use reqwest::Client;

use crate::alerts::engine::AlertEngineConfig;
use crate::api::rest::DaemonHealth;
use crate::domain::alert_report::AlertReport;
use crate::domain::summary::FleetSummary;

pub struct AeroWatchClient {
    base_url: String,
    http: Client,
}

impl AeroWatchClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Client for a daemon bound to `http_addr` (e.g. `127.0.0.1:9300`).
    pub fn for_addr(http_addr: &str) -> Result<Self> {
        if http_addr.starts_with("http://") || http_addr.starts_with("https://") {
            Self::new(http_addr)
        } else {
            Self::new(&format!("http://{}", http_addr))
        }
    }

    pub async fn health(&self) -> Result<DaemonHealth> {
        self.get("/health").await
    }

    pub async fn alerts(&self) -> Result<AlertReport> {
        self.get("/api/v1/alerts").await
    }

    pub async fn refresh(&self) -> Result<AlertReport> {
        self.post("/api/v1/alerts/refresh").await
    }

    pub async fn summary(&self) -> Result<FleetSummary> {
        self.get("/api/v1/summary").await
    }

    pub async fn engine_config(&self) -> Result<AlertEngineConfig> {
        self.get("/api/v1/config").await
    }

    // ── Internal helpers ───────────────────────────────────

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {}", url))?;

        if !resp.status().is_success() {
            bail!("{} returned {}", url, resp.status());
        }

        resp.json()
            .await
            .with_context(|| format!("parsing response from {}", url))
    }

    async fn post<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .post(&url)
            .send()
            .await
            .with_context(|| format!("POST {}", url))?;

        if !resp.status().is_success() {
            bail!("{} returned {}", url, resp.status());
        }

        resp.json()
            .await
            .with_context(|| format!("parsing response from {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_addr_adds_scheme() {
        let client = AeroWatchClient::for_addr("127.0.0.1:9300").unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:9300");

        let client = AeroWatchClient::for_addr("https://fleet.example/").unwrap();
        assert_eq!(client.base_url, "https://fleet.example");
    }
}
