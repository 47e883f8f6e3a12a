// Alert engine - runs every enabled rule in order and ranks the result.

use async_graphql::{InputObject, SimpleObject};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::Alert;
use super::rules::{evaluate_rule, RuleContext, RuleId};
use crate::domain::types::{Base, Drone};

/// Numeric cut-offs used by the battery and capacity rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SimpleObject, InputObject)]
#[graphql(input_name = "AlertThresholdsInput")]
#[serde(default)]
pub struct AlertThresholds {
    /// Battery at or below this raises a warning.
    pub battery_warning_pct: u8,
    /// Battery at or below this is critical (return to base).
    pub battery_critical_pct: u8,
    /// Base capacity at or above this raises a warning.
    pub capacity_warning_pct: u8,
    /// Base capacity at or above this is critical.
    pub capacity_critical_pct: u8,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            battery_warning_pct: 20,
            battery_critical_pct: 10,
            capacity_warning_pct: 90,
            capacity_critical_pct: 95,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThresholdError {
    #[error("{field} is {value}%, must be at most 100%")]
    OutOfRange { field: &'static str, value: u8 },
    #[error("battery critical threshold ({critical}%) is above the warning threshold ({warning}%)")]
    BatteryOrder { warning: u8, critical: u8 },
    #[error("capacity critical threshold ({critical}%) is below the warning threshold ({warning}%)")]
    CapacityOrder { warning: u8, critical: u8 },
}

impl AlertThresholds {
    pub fn validate(&self) -> Result<(), ThresholdError> {
        for (field, value) in [
            ("battery_warning_pct", self.battery_warning_pct),
            ("battery_critical_pct", self.battery_critical_pct),
            ("capacity_warning_pct", self.capacity_warning_pct),
            ("capacity_critical_pct", self.capacity_critical_pct),
        ] {
            if value > 100 {
                return Err(ThresholdError::OutOfRange { field, value });
            }
        }
        if self.battery_critical_pct > self.battery_warning_pct {
            return Err(ThresholdError::BatteryOrder {
                warning: self.battery_warning_pct,
                critical: self.battery_critical_pct,
            });
        }
        if self.capacity_critical_pct < self.capacity_warning_pct {
            return Err(ThresholdError::CapacityOrder {
                warning: self.capacity_warning_pct,
                critical: self.capacity_critical_pct,
            });
        }
        Ok(())
    }
}

/// Alert engine configuration - the `alerts` section of config.yaml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(default)]
pub struct AlertEngineConfig {
    pub thresholds: AlertThresholds,
    /// Rules that are skipped entirely.
    pub disabled_rules: Vec<RuleId>,
}

impl AlertEngineConfig {
    pub fn is_enabled(&self, rule_id: RuleId) -> bool {
        !self.disabled_rules.contains(&rule_id)
    }

    pub fn validate(&self) -> Result<(), ThresholdError> {
        self.thresholds.validate()
    }
}

/// Stateless evaluator. Holding it only pins a configuration.
#[derive(Debug, Clone, Default)]
pub struct AlertEngine {
    config: AlertEngineConfig,
}

impl AlertEngine {
    pub fn new(config: AlertEngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlertEngineConfig {
        &self.config
    }

    pub fn evaluate(&self, drones: &[Drone], bases: &[Base]) -> Vec<Alert> {
        evaluate(drones, bases, &self.config)
    }
}

/// Evaluate every enabled rule and return alerts ranked by severity.
///
/// Rules run in `RuleId::all()` order and the sort is stable, so alerts of
/// equal severity keep generation order: drone rules before base rules, and
/// snapshot order within a rule.
pub fn evaluate(drones: &[Drone], bases: &[Base], config: &AlertEngineConfig) -> Vec<Alert> {
    let ctx = RuleContext {
        drones,
        bases,
        thresholds: &config.thresholds,
    };

    let mut alerts = Vec::new();
    for rule_id in RuleId::all() {
        if !config.is_enabled(*rule_id) {
            continue;
        }
        alerts.extend(evaluate_rule(*rule_id, &ctx));
    }

    alerts.sort_by_key(|alert| std::cmp::Reverse(alert.severity.rank()));
    alerts
}
