//! FleetSnapshot — one poll's worth of drones, bases and routes.

use std::path::Path;

use anyhow::{Context, Result};
use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{lenient_seq, Base, Drone, Route};

/// A collection that could not be fetched and was replaced by an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
pub struct FetchError {
    pub collection: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, SimpleObject)]
pub struct FleetSnapshot {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub drones: Vec<Drone>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub bases: Vec<Base>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub fetched_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fetch_errors: Vec<FetchError>,
}

impl FleetSnapshot {
    /// Load a snapshot file. `.yaml`/`.yml` are read as YAML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot from {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );

        let snapshot: FleetSnapshot = if is_yaml {
            serde_yaml::from_str(&content)
                .with_context(|| format!("failed to parse snapshot from {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse snapshot from {}", path.display()))?
        };
        Ok(snapshot)
    }

    pub fn is_degraded(&self) -> bool {
        !self.fetch_errors.is_empty()
    }
}
