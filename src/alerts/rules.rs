// Rule evaluation for fleet alerts.
//
// Each rule scans one snapshot collection and returns every alert it raises.
// Records missing the field a rule inspects simply do not match that rule.

use serde::{Deserialize, Serialize};

use super::engine::AlertThresholds;
use super::model::{Alert, AlertKind, Severity, SubjectKind};
use crate::domain::types::{Base, BaseStatus, CameraStatus, Drone, DroneStatus, SignalStrength};

/// Identifier for each hardcoded rule. `all()` is the evaluation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, async_graphql::Enum,
)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    LowBattery,
    CameraFault,
    DroneOffline,
    DroneMaintenance,
    BaseCapacity,
    BaseUnavailable,
}

impl RuleId {
    pub fn all() -> &'static [RuleId] {
        &[
            Self::LowBattery,
            Self::CameraFault,
            Self::DroneOffline,
            Self::DroneMaintenance,
            Self::BaseCapacity,
            Self::BaseUnavailable,
        ]
    }

    /// Stable id used in config files.
    pub fn key(&self) -> &'static str {
        match self {
            Self::LowBattery => "low-battery",
            Self::CameraFault => "camera-fault",
            Self::DroneOffline => "drone-offline",
            Self::DroneMaintenance => "drone-maintenance",
            Self::BaseCapacity => "base-capacity",
            Self::BaseUnavailable => "base-unavailable",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LowBattery => "Low Battery",
            Self::CameraFault => "Camera Fault",
            Self::DroneOffline => "Offline Drone",
            Self::DroneMaintenance => "Drone Maintenance",
            Self::BaseCapacity => "Base Near Capacity",
            Self::BaseUnavailable => "Base Unavailable",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::LowBattery => "Drone battery at or below the warning threshold; critical at the RTB threshold",
            Self::CameraFault => "Drone camera reports anything other than OK",
            Self::DroneOffline => "Drone status or signal strength is Offline",
            Self::DroneMaintenance => "Drone is in scheduled maintenance",
            Self::BaseCapacity => "Base litter store at or above the warning threshold; critical above the full threshold",
            Self::BaseUnavailable => "Base is in maintenance or offline",
        }
    }

    pub fn subject_kind(&self) -> SubjectKind {
        match self {
            Self::LowBattery | Self::CameraFault | Self::DroneOffline | Self::DroneMaintenance => {
                SubjectKind::Drone
            }
            Self::BaseCapacity | Self::BaseUnavailable => SubjectKind::Base,
        }
    }
}

/// Inputs shared by every rule during one evaluation pass.
pub struct RuleContext<'a> {
    pub drones: &'a [Drone],
    pub bases: &'a [Base],
    pub thresholds: &'a AlertThresholds,
}

/// Run a single rule against the context, in snapshot order.
pub fn evaluate_rule(rule_id: RuleId, ctx: &RuleContext) -> Vec<Alert> {
    match rule_id {
        RuleId::LowBattery => evaluate_low_battery(ctx),
        RuleId::CameraFault => evaluate_camera_fault(ctx),
        RuleId::DroneOffline => evaluate_drone_offline(ctx),
        RuleId::DroneMaintenance => evaluate_drone_maintenance(ctx),
        RuleId::BaseCapacity => evaluate_base_capacity(ctx),
        RuleId::BaseUnavailable => evaluate_base_unavailable(ctx),
    }
}

fn drone_alert(
    drone: &Drone,
    kind: AlertKind,
    severity: Severity,
    status: String,
    reason: &str,
) -> Alert {
    Alert {
        kind,
        subject_id: drone.id.clone(),
        subject_name: drone.display_name().to_string(),
        subject_kind: SubjectKind::Drone,
        status,
        reason: reason.to_string(),
        severity,
    }
}

fn base_alert(base: &Base, kind: AlertKind, severity: Severity, status: String, reason: &str) -> Alert {
    Alert {
        kind,
        subject_id: base.id.clone(),
        subject_name: base.display_name().to_string(),
        subject_kind: SubjectKind::Base,
        status,
        reason: reason.to_string(),
        severity,
    }
}

fn evaluate_low_battery(ctx: &RuleContext) -> Vec<Alert> {
    let t = ctx.thresholds;
    ctx.drones
        .iter()
        .filter_map(|drone| {
            let battery = drone.battery?;
            if battery > t.battery_warning_pct {
                return None;
            }
            let (severity, reason) = if battery <= t.battery_critical_pct {
                (Severity::Critical, "Critical - RTB")
            } else {
                (Severity::Warning, "Warning - Monitor")
            };
            Some(drone_alert(
                drone,
                AlertKind::LowBattery,
                severity,
                format!("{}%", battery),
                reason,
            ))
        })
        .collect()
}

fn evaluate_camera_fault(ctx: &RuleContext) -> Vec<Alert> {
    ctx.drones
        .iter()
        .filter_map(|drone| {
            let camera = drone.camera_status?;
            if camera == CameraStatus::Ok {
                return None;
            }
            Some(drone_alert(
                drone,
                AlertKind::CameraError,
                Severity::Warning,
                camera.to_string(),
                "Equipment malfunction",
            ))
        })
        .collect()
}

fn evaluate_drone_offline(ctx: &RuleContext) -> Vec<Alert> {
    ctx.drones
        .iter()
        .filter(|drone| {
            drone.status == Some(DroneStatus::Offline)
                || drone.signal_strength == Some(SignalStrength::Offline)
        })
        .map(|drone| {
            drone_alert(
                drone,
                AlertKind::Offline,
                Severity::Critical,
                "Inactive".to_string(),
                "Connection lost",
            )
        })
        .collect()
}

fn evaluate_drone_maintenance(ctx: &RuleContext) -> Vec<Alert> {
    ctx.drones
        .iter()
        .filter(|drone| drone.status == Some(DroneStatus::Maintenance))
        .map(|drone| {
            drone_alert(
                drone,
                AlertKind::Maintenance,
                Severity::Info,
                "In Service".to_string(),
                "Scheduled maintenance",
            )
        })
        .collect()
}

fn evaluate_base_capacity(ctx: &RuleContext) -> Vec<Alert> {
    let t = ctx.thresholds;
    ctx.bases
        .iter()
        .filter_map(|base| {
            let capacity = base.litter_capacity_percent?;
            if capacity < t.capacity_warning_pct {
                return None;
            }
            let severity = if capacity >= t.capacity_critical_pct {
                Severity::Critical
            } else {
                Severity::Warning
            };
            Some(base_alert(
                base,
                AlertKind::BaseFull,
                severity,
                format!("{}%", capacity),
                "Collection required",
            ))
        })
        .collect()
}

fn evaluate_base_unavailable(ctx: &RuleContext) -> Vec<Alert> {
    ctx.bases
        .iter()
        .filter_map(|base| {
            let status = base.status?;
            let reason = match status {
                BaseStatus::Maintenance => "Service required",
                BaseStatus::Offline => "Base offline",
                BaseStatus::Available | BaseStatus::Full => return None,
            };
            Some(base_alert(
                base,
                AlertKind::BaseStatus,
                Severity::Warning,
                status.to_string(),
                reason,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_drone(id: &str) -> Drone {
        Drone {
            id: id.to_string(),
            name: Some(format!("Drone {}", id)),
            ..Default::default()
        }
    }

    fn make_base(id: &str) -> Base {
        Base {
            id: id.to_string(),
            name: Some(format!("Base {}", id)),
            ..Default::default()
        }
    }

    fn run(rule_id: RuleId, drones: &[Drone], bases: &[Base]) -> Vec<Alert> {
        let thresholds = AlertThresholds::default();
        let ctx = RuleContext {
            drones,
            bases,
            thresholds: &thresholds,
        };
        evaluate_rule(rule_id, &ctx)
    }

    #[test]
    fn test_low_battery_boundaries() {
        let drones: Vec<Drone> = [10, 11, 20, 21]
            .iter()
            .map(|pct| Drone {
                battery: Some(*pct),
                ..make_drone(&pct.to_string())
            })
            .collect();

        let alerts = run(RuleId::LowBattery, &drones, &[]);
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert_eq!(alerts[0].reason, "Critical - RTB");
        assert_eq!(alerts[1].severity, Severity::Warning);
        assert_eq!(alerts[1].reason, "Warning - Monitor");
        assert_eq!(alerts[2].status, "20%");
    }

    #[test]
    fn test_low_battery_skips_missing_battery() {
        let alerts = run(RuleId::LowBattery, &[make_drone("D1")], &[]);
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_camera_fault_reports_status() {
        let drones = vec![
            Drone {
                camera_status: Some(CameraStatus::Ok),
                ..make_drone("D1")
            },
            Drone {
                camera_status: Some(CameraStatus::Warning),
                ..make_drone("D2")
            },
            make_drone("D3"),
        ];

        let alerts = run(RuleId::CameraFault, &drones, &[]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].subject_id, "D2");
        assert_eq!(alerts[0].status, "Warning");
        assert_eq!(alerts[0].kind, AlertKind::CameraError);
    }

    #[test]
    fn test_offline_by_status_or_signal_fires_once() {
        let drones = vec![
            Drone {
                status: Some(DroneStatus::Offline),
                signal_strength: Some(SignalStrength::Offline),
                ..make_drone("D1")
            },
            Drone {
                status: Some(DroneStatus::Active),
                signal_strength: Some(SignalStrength::Offline),
                ..make_drone("D2")
            },
            Drone {
                status: Some(DroneStatus::Active),
                signal_strength: Some(SignalStrength::Weak),
                ..make_drone("D3")
            },
        ];

        let alerts = run(RuleId::DroneOffline, &drones, &[]);
        let ids: Vec<&str> = alerts.iter().map(|a| a.subject_id.as_str()).collect();
        assert_eq!(ids, vec!["D1", "D2"]);
        assert!(alerts.iter().all(|a| a.status == "Inactive"));
    }

    #[test]
    fn test_maintenance_is_info() {
        let drones = vec![Drone {
            status: Some(DroneStatus::Maintenance),
            ..make_drone("D7")
        }];
        let alerts = run(RuleId::DroneMaintenance, &drones, &[]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Info);
        assert_eq!(alerts[0].status, "In Service");
    }

    #[test]
    fn test_base_capacity_boundaries() {
        let bases: Vec<Base> = [89, 90, 94, 95]
            .iter()
            .map(|pct| Base {
                litter_capacity_percent: Some(*pct),
                ..make_base(&format!("B_{}", pct))
            })
            .collect();

        let alerts = run(RuleId::BaseCapacity, &[], &bases);
        let severities: Vec<Severity> = alerts.iter().map(|a| a.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Warning, Severity::Warning, Severity::Critical]
        );
        assert_eq!(alerts[0].subject_kind, SubjectKind::Base);
    }

    #[test]
    fn test_base_unavailable_reasons() {
        let bases = vec![
            Base {
                status: Some(BaseStatus::Maintenance),
                ..make_base("B_1")
            },
            Base {
                status: Some(BaseStatus::Full),
                ..make_base("B_2")
            },
            Base {
                status: Some(BaseStatus::Offline),
                ..make_base("B_3")
            },
        ];

        let alerts = run(RuleId::BaseUnavailable, &[], &bases);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].reason, "Service required");
        assert_eq!(alerts[0].status, "Maintenance");
        assert_eq!(alerts[1].reason, "Base offline");
        assert_eq!(alerts[1].status, "Offline");
    }

    #[test]
    fn test_rule_catalogue_complete() {
        for rule in RuleId::all() {
            assert!(!rule.display_name().is_empty());
            assert!(!rule.description().is_empty());
            let json = serde_json::to_value(rule).unwrap();
            assert_eq!(json, rule.key());
        }
    }
}
