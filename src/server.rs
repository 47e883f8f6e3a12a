use anyhow::{Context, Result};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::http::{HeaderValue, Method};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::MissedTickBehavior;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::alerts::engine::AlertEngineConfig;
use crate::api::graphql::{self, AeroWatchSchema};
use crate::api::rest::{self, AppState};
use crate::backend::BackendClient;
use crate::config::{BackendConfig, DaemonConfig};
use crate::domain::fleet_service::FleetService;

pub async fn run(
    daemon: DaemonConfig,
    backend: BackendConfig,
    alerts: AlertEngineConfig,
) -> Result<()> {
    crate::logging::init(&daemon.log_level, true);

    info!(version = env!("CARGO_PKG_VERSION"), "aerowatch daemon starting");

    let client = BackendClient::new(backend).context("building backend client")?;
    let fleet = Arc::new(FleetService::new(client, alerts));

    let app_state = AppState {
        fleet: fleet.clone(),
    };

    let schema = graphql::build_schema(fleet.clone());

    // GraphQL sub-router carries its own state
    let graphql_router = Router::new()
        .route("/graphql", get(graphql_playground).post(graphql_handler))
        .with_state(schema);

    let app = rest::router(app_state)
        .merge(graphql_router)
        .layer(cors_layer(&daemon.cors_origins))
        .layer(TraceLayer::new_for_http());

    let http_addr = &daemon.http_addr;
    let listener = TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("binding to {}", http_addr))?;

    info!(addr = %http_addr, backend = %fleet.backend_url(), "HTTP server listening");

    // Poll loop. The first tick fires immediately and doubles as the initial fetch.
    if daemon.poll_interval_secs > 0 {
        let poll_fleet = fleet.clone();
        let interval_secs = daemon.poll_interval_secs;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let report = poll_fleet.refresh().await;
                if report.fetch_errors.is_empty() {
                    info!(
                        alerts = report.counts.total,
                        critical = report.counts.critical,
                        "poll completed"
                    );
                } else {
                    warn!(
                        alerts = report.counts.total,
                        failed = report.fetch_errors.len(),
                        "poll completed with fetch errors"
                    );
                }
            }
        });
    } else {
        info!("polling disabled, alerts refresh only on request");
    }

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("aerowatch daemon stopped");
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any)
}

async fn graphql_playground() -> Html<String> {
    Html(
        async_graphql::http::playground_source(
            async_graphql::http::GraphQLPlaygroundConfig::new("/graphql"),
        ),
    )
}

async fn graphql_handler(
    State(schema): State<AeroWatchSchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { info!("Received Ctrl+C, shutting down"); },
        _ = terminate => { info!("Received SIGTERM, shutting down"); },
    }
}
