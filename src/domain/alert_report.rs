//! AlertReport — one evaluation pass wrapped with integrity metadata.

use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::alerts::model::{Alert, SeverityCounts};

use super::snapshot::{FetchError, FleetSnapshot};

#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
pub struct AlertReport {
    /// SHA-256 checksum of the serialized alert list: "sha256:<hex>"
    pub checksum: String,
    pub generated_at: DateTime<Utc>,
    /// When the underlying snapshot was fetched, if it came from the backend.
    pub snapshot_at: Option<DateTime<Utc>>,
    pub engine_version: String,
    pub counts: SeverityCounts,
    pub drone_count: u32,
    pub base_count: u32,
    pub route_count: u32,
    /// Collections that failed to load and were evaluated as empty.
    pub fetch_errors: Vec<FetchError>,
    pub alerts: Vec<Alert>,
}

impl AlertReport {
    pub fn new(snapshot: &FleetSnapshot, alerts: Vec<Alert>) -> Self {
        Self {
            checksum: checksum(&alerts),
            generated_at: Utc::now(),
            snapshot_at: snapshot.fetched_at,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            counts: SeverityCounts::tally(&alerts),
            drone_count: snapshot.drones.len() as u32,
            base_count: snapshot.bases.len() as u32,
            route_count: snapshot.routes.len() as u32,
            fetch_errors: snapshot.fetch_errors.clone(),
            alerts,
        }
    }

    /// Seconds since the report was generated.
    pub fn age_secs(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.generated_at)
            .num_seconds()
    }

    /// Verify the checksum matches the alert list. Returns true if valid.
    pub fn verify(&self) -> bool {
        self.checksum == checksum(&self.alerts)
    }
}

fn checksum(alerts: &[Alert]) -> String {
    let serialized = serde_json::to_string(alerts).unwrap_or_default();
    let hash = Sha256::digest(serialized.as_bytes());
    format!("sha256:{:x}", hash)
}
