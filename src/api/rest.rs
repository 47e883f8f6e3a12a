use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::alerts::engine::AlertEngineConfig;
use crate::alerts::model::Alert;
use crate::domain::alert_report::AlertReport;
use crate::domain::fleet_service::FleetService;
use crate::domain::snapshot::FleetSnapshot;
use crate::domain::summary::FleetSummary;

/// Shared application state for all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub fleet: Arc<FleetService>,
}

#[derive(Debug, Clone, Serialize, Deserialize, async_graphql::SimpleObject)]
pub struct DaemonHealth {
    pub version: String,
    pub uptime_secs: u64,
    pub backend_url: String,
    pub last_refresh: Option<DateTime<Utc>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/alerts", get(alerts))
        .route("/api/v1/alerts/refresh", post(refresh_alerts))
        .route("/api/v1/evaluate", post(evaluate))
        .route("/api/v1/summary", get(summary))
        .route("/api/v1/config", get(engine_config).put(update_engine_config))
        .with_state(state)
}

pub(crate) async fn daemon_health(fleet: &FleetService) -> DaemonHealth {
    DaemonHealth {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: fleet.uptime_secs(),
        backend_url: fleet.backend_url().to_string(),
        last_refresh: fleet.last_refresh().await,
    }
}

async fn health(State(state): State<AppState>) -> Json<DaemonHealth> {
    Json(daemon_health(&state.fleet).await)
}

/// Serve the cached report. Never triggers a fetch.
/// Returns 503 until the first poll has completed.
async fn alerts(
    State(state): State<AppState>,
) -> Result<Json<AlertReport>, (StatusCode, String)> {
    state
        .fleet
        .cached_report()
        .await
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "alerts not yet available (initial poll in progress)".to_string(),
            )
        })
}

/// Fetch a fresh snapshot, evaluate it and return the new report.
async fn refresh_alerts(State(state): State<AppState>) -> Json<AlertReport> {
    Json(state.fleet.refresh().await)
}

/// Evaluate a posted snapshot with the current engine config. Stateless.
async fn evaluate(
    State(state): State<AppState>,
    Json(snapshot): Json<FleetSnapshot>,
) -> Json<Vec<Alert>> {
    Json(state.fleet.evaluate_snapshot(&snapshot).await)
}

async fn summary(
    State(state): State<AppState>,
) -> Result<Json<FleetSummary>, (StatusCode, String)> {
    state.fleet.summary().await.map(Json).ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "summary not yet available (initial poll in progress)".to_string(),
        )
    })
}

async fn engine_config(State(state): State<AppState>) -> Json<AlertEngineConfig> {
    Json(state.fleet.engine_config().await)
}

async fn update_engine_config(
    State(state): State<AppState>,
    Json(config): Json<AlertEngineConfig>,
) -> Result<Json<AlertEngineConfig>, (StatusCode, String)> {
    state
        .fleet
        .update_config(config)
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("{:#}", e)))?;
    Ok(Json(state.fleet.engine_config().await))
}
