// Alert records produced by the rule engine.

use std::fmt;

use async_graphql::{Enum, SimpleObject};
use serde::{Deserialize, Serialize};

/// Alert severity. Ordering follows rank: `Info < Warning < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Enum,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Sort rank: critical=3, warning=2, info=1.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 3,
            Self::Warning => 2,
            Self::Info => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The alert type tag shown in the dashboard's "Alert Type" column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum)]
pub enum AlertKind {
    #[serde(rename = "Low Battery")]
    LowBattery,
    #[serde(rename = "Camera Error")]
    CameraError,
    Offline,
    Maintenance,
    #[serde(rename = "Base Full")]
    BaseFull,
    #[serde(rename = "Base Status")]
    BaseStatus,
}

impl AlertKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LowBattery => "Low Battery",
            Self::CameraError => "Camera Error",
            Self::Offline => "Offline",
            Self::Maintenance => "Maintenance",
            Self::BaseFull => "Base Full",
            Self::BaseStatus => "Base Status",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What kind of record raised the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum)]
pub enum SubjectKind {
    Drone,
    Base,
}

impl SubjectKind {
    /// Console page that manages this kind of subject.
    pub fn nav_path(&self) -> &'static str {
        match self {
            Self::Drone => "/drones",
            Self::Base => "/bases",
        }
    }
}

/// A single operational alert. Recomputed on every evaluation, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub subject_id: String,
    pub subject_name: String,
    pub subject_kind: SubjectKind,
    pub status: String,
    pub reason: String,
    pub severity: Severity,
}

/// Per-severity tally of an alert list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
pub struct SeverityCounts {
    pub critical: u32,
    pub warning: u32,
    pub info: u32,
    pub total: u32,
}

impl SeverityCounts {
    pub fn tally(alerts: &[Alert]) -> Self {
        let mut counts = Self::default();
        for alert in alerts {
            match alert.severity {
                Severity::Critical => counts.critical += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Info => counts.info += 1,
            }
        }
        counts.total = alerts.len() as u32;
        counts
    }
}
