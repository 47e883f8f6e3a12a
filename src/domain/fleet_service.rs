//! Fleet service — wraps the backend client, the alert engine and the caches.
//!
//! Implements the one-way pipeline:
//!   Backend → FleetSnapshot → AlertEngine → AlertReport → MemoryCache → API
//!
//! API reads come from the memory cache. `refresh()` drives the full pipeline
//! and is serialized so two refreshes never overlap.

use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::alerts::engine::{AlertEngine, AlertEngineConfig};
use crate::alerts::model::Alert;
use crate::backend::BackendClient;

use super::alert_report::AlertReport;
use super::snapshot::FleetSnapshot;
use super::summary::FleetSummary;

pub struct FleetService {
    backend: BackendClient,
    engine: RwLock<AlertEngine>,
    snapshot: RwLock<Option<FleetSnapshot>>,
    report: RwLock<Option<AlertReport>>,
    refresh_lock: Mutex<()>,
    start_time: Instant,
}

impl FleetService {
    pub fn new(backend: BackendClient, engine_config: AlertEngineConfig) -> Self {
        Self {
            backend,
            engine: RwLock::new(AlertEngine::new(engine_config)),
            snapshot: RwLock::new(None),
            report: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            start_time: Instant::now(),
        }
    }

    /// Fetch a fresh snapshot, evaluate it and swap both caches.
    pub async fn refresh(&self) -> AlertReport {
        let _guard = self.refresh_lock.lock().await;

        let snapshot = self.backend.fetch_snapshot().await;
        if snapshot.is_degraded() {
            warn!(
                failed = snapshot.fetch_errors.len(),
                "snapshot incomplete, evaluating with empty collections"
            );
        }

        let report = self.evaluate_into_report(&snapshot).await;
        self.store(snapshot, report.clone()).await;
        report
    }

    /// Replace the engine config and re-evaluate the cached snapshot.
    ///
    /// Returns the new report, or `None` if no snapshot has been fetched yet.
    pub async fn update_config(&self, config: AlertEngineConfig) -> Result<Option<AlertReport>> {
        config.validate()?;

        let _guard = self.refresh_lock.lock().await;
        *self.engine.write().await = AlertEngine::new(config);
        info!("alert engine config updated");

        let Some(snapshot) = self.snapshot.read().await.clone() else {
            return Ok(None);
        };
        let report = self.evaluate_into_report(&snapshot).await;
        self.store(snapshot, report.clone()).await;
        Ok(Some(report))
    }

    /// Evaluate a caller-provided snapshot without touching the caches.
    pub async fn evaluate_snapshot(&self, snapshot: &FleetSnapshot) -> Vec<Alert> {
        self.engine
            .read()
            .await
            .evaluate(&snapshot.drones, &snapshot.bases)
    }

    pub async fn cached_report(&self) -> Option<AlertReport> {
        self.report.read().await.clone()
    }

    pub async fn cached_snapshot(&self) -> Option<FleetSnapshot> {
        self.snapshot.read().await.clone()
    }

    pub async fn summary(&self) -> Option<FleetSummary> {
        self.snapshot
            .read()
            .await
            .as_ref()
            .map(FleetSummary::from_snapshot)
    }

    pub async fn engine_config(&self) -> AlertEngineConfig {
        self.engine.read().await.config().clone()
    }

    /// When the cached snapshot was fetched from the backend. Config updates
    /// re-evaluate without refetching and leave this unchanged.
    pub async fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.snapshot
            .read()
            .await
            .as_ref()
            .and_then(|s| s.fetched_at)
    }

    pub fn backend_url(&self) -> &str {
        self.backend.base_url()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    async fn evaluate_into_report(&self, snapshot: &FleetSnapshot) -> AlertReport {
        let alerts = self.evaluate_snapshot(snapshot).await;
        AlertReport::new(snapshot, alerts)
    }

    /// Swap snapshot and report together so readers never see one without the other.
    async fn store(&self, snapshot: FleetSnapshot, report: AlertReport) {
        let mut snapshot_slot = self.snapshot.write().await;
        let mut report_slot = self.report.write().await;

        let changed = report_slot
            .as_ref()
            .is_none_or(|previous| previous.checksum != report.checksum);
        if changed {
            info!(
                checksum = %report.checksum,
                critical = report.counts.critical,
                warning = report.counts.warning,
                info = report.counts.info,
                "alert set changed"
            );
        }

        *snapshot_slot = Some(snapshot);
        *report_slot = Some(report);
    }
}
