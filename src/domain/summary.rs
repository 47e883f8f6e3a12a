//! Fleet summary — the counters above the dashboard's alert table.

use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

use super::snapshot::FleetSnapshot;
use super::types::{BaseStatus, DroneStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
pub struct StatusCount {
    pub status: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
pub struct FleetSummary {
    pub drones_total: u32,
    /// One entry per known status, in declaration order. Drones with no
    /// readable status are counted under "Unknown".
    pub drones_by_status: Vec<StatusCount>,
    pub bases_total: u32,
    pub bases_by_status: Vec<StatusCount>,
    pub routes_total: u32,
    /// Mean battery over drones that report one.
    pub mean_battery_pct: Option<f64>,
}

impl FleetSummary {
    pub fn from_snapshot(snapshot: &FleetSnapshot) -> Self {
        let mut drones_by_status: Vec<StatusCount> = DroneStatus::all()
            .iter()
            .map(|status| StatusCount {
                status: status.to_string(),
                count: snapshot
                    .drones
                    .iter()
                    .filter(|d| d.status == Some(*status))
                    .count() as u32,
            })
            .collect();
        let unknown = snapshot.drones.iter().filter(|d| d.status.is_none()).count();
        if unknown > 0 {
            drones_by_status.push(StatusCount {
                status: "Unknown".to_string(),
                count: unknown as u32,
            });
        }

        let mut bases_by_status: Vec<StatusCount> = BaseStatus::all()
            .iter()
            .map(|status| StatusCount {
                status: status.to_string(),
                count: snapshot
                    .bases
                    .iter()
                    .filter(|b| b.status == Some(*status))
                    .count() as u32,
            })
            .collect();
        let unknown = snapshot.bases.iter().filter(|b| b.status.is_none()).count();
        if unknown > 0 {
            bases_by_status.push(StatusCount {
                status: "Unknown".to_string(),
                count: unknown as u32,
            });
        }

        let batteries: Vec<f64> = snapshot
            .drones
            .iter()
            .filter_map(|d| d.battery.map(f64::from))
            .collect();
        let mean_battery_pct = if batteries.is_empty() {
            None
        } else {
            Some(batteries.iter().sum::<f64>() / batteries.len() as f64)
        };

        Self {
            drones_total: snapshot.drones.len() as u32,
            drones_by_status,
            bases_total: snapshot.bases.len() as u32,
            bases_by_status,
            routes_total: snapshot.routes.len() as u32,
            mean_battery_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Base, Drone};

    fn count_of(counts: &[StatusCount], status: &str) -> u32 {
        counts
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    #[test]
    fn test_summary_counts() {
        let snapshot = FleetSnapshot {
            drones: vec![
                Drone {
                    status: Some(DroneStatus::OnMission),
                    battery: Some(80),
                    ..Default::default()
                },
                Drone {
                    status: Some(DroneStatus::OnMission),
                    battery: Some(40),
                    ..Default::default()
                },
                Drone::default(),
            ],
            bases: vec![Base {
                status: Some(BaseStatus::Full),
                ..Default::default()
            }],
            ..Default::default()
        };

        let summary = FleetSummary::from_snapshot(&snapshot);
        assert_eq!(summary.drones_total, 3);
        assert_eq!(count_of(&summary.drones_by_status, "On Mission"), 2);
        assert_eq!(count_of(&summary.drones_by_status, "Unknown"), 1);
        assert_eq!(count_of(&summary.bases_by_status, "Full"), 1);
        assert_eq!(summary.mean_battery_pct, Some(60.0));
    }

    #[test]
    fn test_empty_summary() {
        let summary = FleetSummary::from_snapshot(&FleetSnapshot::default());
        assert_eq!(summary.drones_total, 0);
        assert_eq!(summary.drones_by_status.len(), DroneStatus::all().len());
        assert_eq!(summary.mean_battery_pct, None);
    }
}
