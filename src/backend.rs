//! HTTP client for the fleet CRUD backend (drones, bases, routes).

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::domain::snapshot::{FetchError, FleetSnapshot};
use crate::domain::types::{decode_collection, Base, Drone, Route};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("building HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("GET {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("parsing response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned a JSON {found}, expected an array")]
    UnexpectedBody { url: String, found: &'static str },
}

pub struct BackendClient {
    config: BackendConfig,
    http: Client,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(BackendError::Client)?;
        Ok(Self { config, http })
    }

    pub fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    pub async fn drones(&self) -> Result<Vec<Drone>, BackendError> {
        self.get_collection(&self.config.drones_path).await
    }

    pub async fn bases(&self) -> Result<Vec<Base>, BackendError> {
        self.get_collection(&self.config.bases_path).await
    }

    pub async fn routes(&self) -> Result<Vec<Route>, BackendError> {
        self.get_collection(&self.config.routes_path).await
    }

    /// Fetch all three collections concurrently.
    ///
    /// A collection that fails is replaced by an empty list and recorded in
    /// `fetch_errors`; the other collections are kept.
    pub async fn fetch_snapshot(&self) -> FleetSnapshot {
        let (drones, bases, routes) = tokio::join!(self.drones(), self.bases(), self.routes());

        let mut fetch_errors = Vec::new();
        let drones = or_empty("drones", drones, &mut fetch_errors);
        let bases = or_empty("bases", bases, &mut fetch_errors);
        let routes = or_empty("routes", routes, &mut fetch_errors);

        debug!(
            drones = drones.len(),
            bases = bases.len(),
            routes = routes.len(),
            failed = fetch_errors.len(),
            "fetched fleet snapshot"
        );

        FleetSnapshot {
            drones,
            bases,
            routes,
            fetched_at: Some(Utc::now()),
            fetch_errors,
        }
    }

    // ── Internal helpers ───────────────────────────────────

    async fn get_collection<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, BackendError> {
        let url = format!("{}{}", self.base_url(), path);
        let mut req = self.http.get(&url);
        if let Some(token) = &self.config.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|source| BackendError::Request {
            url: url.clone(),
            source,
        })?;

        if !resp.status().is_success() {
            return Err(BackendError::Status {
                url,
                status: resp.status(),
            });
        }

        let value: serde_json::Value = resp
            .json()
            .await
            .map_err(|source| BackendError::Decode {
                url: url.clone(),
                source,
            })?;

        // `null` is an empty collection; any other non-array is a failed fetch.
        match value {
            serde_json::Value::Array(_) | serde_json::Value::Null => Ok(decode_collection(value)),
            other => Err(BackendError::UnexpectedBody {
                url,
                found: json_kind(&other),
            }),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn or_empty<T>(
    collection: &str,
    result: Result<Vec<T>, BackendError>,
    errors: &mut Vec<FetchError>,
) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!(collection, error = %e, "fetch failed, using empty collection");
            errors.push(FetchError {
                collection: collection.to_string(),
                message: e.to_string(),
            });
            Vec::new()
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    /// Serve a stub backend on an ephemeral port and return its base URL.
    pub(crate) async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    pub(crate) fn sample_backend() -> Router {
        Router::new()
            .route(
                "/drones/",
                get(|| async {
                    Json(json!([
                        { "id": 92, "name": "Kestrel", "battery": 9, "camera_status": "OK",
                          "status": "On Mission", "signal_strength": "Strong", "base_assigned": "B_001" },
                        { "id": "D002", "name": "Osprey", "battery": 76, "camera_status": "Error",
                          "status": "Active", "signal_strength": "Medium", "base_assigned": "B_002" },
                        { "id": 81, "name": "Swift", "battery": 55, "camera_status": "OK",
                          "status": "Offline", "signal_strength": "Offline", "base_assigned": "B_001" }
                    ]))
                }),
            )
            .route(
                "/bases/",
                get(|| async {
                    Json(json!([
                        { "id": "B_001", "name": "North Point", "status": "Available",
                          "litter_capacity_percent": 12, "drones_assigned": ["92", "81"] },
                        { "id": "B_003", "name": "South Station", "status": "Full",
                          "litter_capacity_percent": 93 }
                    ]))
                }),
            )
            .route(
                "/bases/routes/",
                get(|| async { Json(json!([{ "id": "R_001_N", "name": "North Route" }])) }),
            )
    }

    fn client_for(url: String) -> BackendClient {
        BackendClient::new(BackendConfig {
            url,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_snapshot() {
        let url = spawn_backend(sample_backend()).await;
        let snapshot = client_for(url).fetch_snapshot().await;

        assert_eq!(snapshot.drones.len(), 3);
        assert_eq!(snapshot.drones[0].id, "92");
        assert_eq!(snapshot.bases.len(), 2);
        assert_eq!(snapshot.routes.len(), 1);
        assert!(snapshot.fetch_errors.is_empty());
        assert!(snapshot.fetched_at.is_some());
    }

    #[tokio::test]
    async fn test_failed_collection_is_empty_with_error() {
        let router = Router::new()
            .route("/drones/", get(|| async { Json(json!([{ "id": "D1", "battery": 50 }])) }))
            .route(
                "/bases/",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            );
        let url = spawn_backend(router).await;
        let snapshot = client_for(url).fetch_snapshot().await;

        assert_eq!(snapshot.drones.len(), 1);
        assert!(snapshot.bases.is_empty());
        assert!(snapshot.routes.is_empty());

        let failed: Vec<&str> = snapshot
            .fetch_errors
            .iter()
            .map(|e| e.collection.as_str())
            .collect();
        assert_eq!(failed, vec!["bases", "routes"]);
        assert!(snapshot.fetch_errors[0].message.contains("500"));
    }

    #[tokio::test]
    async fn test_non_array_body_is_fetch_error() {
        let router = Router::new()
            .route(
                "/drones/",
                get(|| async { Json(json!({ "detail": "Not authenticated" })) }),
            )
            .route("/bases/", get(|| async { Json(json!([{ "id": "B_001" }])) }))
            .route("/bases/routes/", get(|| async { Json(json!([])) }));
        let url = spawn_backend(router).await;
        let snapshot = client_for(url).fetch_snapshot().await;

        assert!(snapshot.drones.is_empty());
        assert_eq!(snapshot.bases.len(), 1);
        assert_eq!(snapshot.fetch_errors.len(), 1);
        assert_eq!(snapshot.fetch_errors[0].collection, "drones");
        assert!(snapshot.fetch_errors[0].message.contains("object"));
    }

    #[tokio::test]
    async fn test_null_body_is_empty_collection() {
        let router = Router::new().route("/drones/", get(|| async { Json(Value::Null) }));
        let url = spawn_backend(router).await;
        assert!(client_for(url).drones().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bearer_token_sent() {
        let router = Router::new().route(
            "/drones/",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if auth == "Bearer s3cret" {
                    Json(json!([{ "id": "D1" }]))
                } else {
                    Json(Value::Null)
                }
            }),
        );
        let url = spawn_backend(router).await;
        let client = BackendClient::new(BackendConfig {
            url,
            token: Some("s3cret".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(client.drones().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_backend_degrades() {
        let client = client_for("http://127.0.0.1:1".to_string());
        let snapshot = client.fetch_snapshot().await;
        assert!(snapshot.drones.is_empty());
        assert_eq!(snapshot.fetch_errors.len(), 3);
    }
}
