use async_graphql::{Context, EmptySubscription, Object, Schema, SimpleObject};
use std::sync::Arc;

use crate::alerts::engine::{AlertEngineConfig, AlertThresholds};
use crate::alerts::model::{Alert, SubjectKind};
use crate::alerts::rules::RuleId;
use crate::domain::alert_report::AlertReport;
use crate::domain::fleet_service::FleetService;
use crate::domain::snapshot::FleetSnapshot;
use crate::domain::summary::FleetSummary;

use super::rest::{daemon_health, DaemonHealth};

pub type AeroWatchSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Catalogue entry describing one alert rule.
#[derive(Debug, Clone, SimpleObject)]
pub struct RuleInfo {
    pub id: RuleId,
    pub name: String,
    pub description: String,
    pub subject_kind: SubjectKind,
    pub enabled: bool,
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn health(&self, ctx: &Context<'_>) -> async_graphql::Result<DaemonHealth> {
        let fleet = ctx.data::<Arc<FleetService>>()?;
        Ok(daemon_health(fleet).await)
    }

    /// Ranked alerts from the latest poll. Empty until the first poll completes.
    async fn alerts(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Alert>> {
        let fleet = ctx.data::<Arc<FleetService>>()?;
        Ok(fleet
            .cached_report()
            .await
            .map(|r| r.alerts)
            .unwrap_or_default())
    }

    async fn report(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<AlertReport>> {
        let fleet = ctx.data::<Arc<FleetService>>()?;
        Ok(fleet.cached_report().await)
    }

    async fn snapshot(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<FleetSnapshot>> {
        let fleet = ctx.data::<Arc<FleetService>>()?;
        Ok(fleet.cached_snapshot().await)
    }

    async fn summary(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<FleetSummary>> {
        let fleet = ctx.data::<Arc<FleetService>>()?;
        Ok(fleet.summary().await)
    }

    async fn engine_config(&self, ctx: &Context<'_>) -> async_graphql::Result<AlertEngineConfig> {
        let fleet = ctx.data::<Arc<FleetService>>()?;
        Ok(fleet.engine_config().await)
    }

    async fn rules(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<RuleInfo>> {
        let fleet = ctx.data::<Arc<FleetService>>()?;
        let config = fleet.engine_config().await;
        Ok(RuleId::all()
            .iter()
            .map(|rule| RuleInfo {
                id: *rule,
                name: rule.display_name().to_string(),
                description: rule.description().to_string(),
                subject_kind: rule.subject_kind(),
                enabled: config.is_enabled(*rule),
            })
            .collect())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Fetch a fresh snapshot and re-evaluate alerts.
    async fn refresh(&self, ctx: &Context<'_>) -> async_graphql::Result<AlertReport> {
        let fleet = ctx.data::<Arc<FleetService>>()?;
        Ok(fleet.refresh().await)
    }

    /// Replace the thresholds, keeping disabled rules, and return the new config.
    async fn update_thresholds(
        &self,
        ctx: &Context<'_>,
        thresholds: AlertThresholds,
    ) -> async_graphql::Result<AlertEngineConfig> {
        let fleet = ctx.data::<Arc<FleetService>>()?;
        let mut config = fleet.engine_config().await;
        config.thresholds = thresholds;
        fleet
            .update_config(config)
            .await
            .map_err(|e| async_graphql::Error::new(format!("{:#}", e)))?;
        Ok(fleet.engine_config().await)
    }
}

pub fn build_schema(fleet: Arc<FleetService>) -> AeroWatchSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(fleet)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::{sample_backend, spawn_backend};
    use crate::backend::BackendClient;
    use crate::config::BackendConfig;

    async fn schema() -> AeroWatchSchema {
        let url = spawn_backend(sample_backend()).await;
        let backend = BackendClient::new(BackendConfig {
            url,
            ..Default::default()
        })
        .unwrap();
        build_schema(Arc::new(FleetService::new(
            backend,
            AlertEngineConfig::default(),
        )))
    }

    #[tokio::test]
    async fn test_refresh_then_query_alerts() {
        let schema = schema().await;

        let resp = schema.execute("mutation { refresh { counts { total } } }").await;
        assert!(resp.errors.is_empty(), "{:?}", resp.errors);

        let resp = schema
            .execute("{ alerts { kind subjectId severity subjectKind } }")
            .await;
        assert!(resp.errors.is_empty(), "{:?}", resp.errors);
        let data = resp.data.into_json().unwrap();
        assert_eq!(data["alerts"][0]["kind"], "LOW_BATTERY");
        assert_eq!(data["alerts"][0]["severity"], "CRITICAL");
        assert_eq!(data["alerts"][0]["subjectKind"], "DRONE");
    }

    #[tokio::test]
    async fn test_update_thresholds_rejects_invalid() {
        let schema = schema().await;
        let resp = schema
            .execute(
                "mutation { updateThresholds(thresholds: { batteryWarningPct: 5, batteryCriticalPct: 10, \
                 capacityWarningPct: 90, capacityCriticalPct: 95 }) { thresholds { batteryWarningPct } } }",
            )
            .await;
        assert_eq!(resp.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_rules_catalogue() {
        let schema = schema().await;
        let resp = schema.execute("{ rules { id enabled } }").await;
        let data = resp.data.into_json().unwrap();
        assert_eq!(data["rules"].as_array().unwrap().len(), RuleId::all().len());
        assert_eq!(data["rules"][0]["id"], "LOW_BATTERY");
    }
}
