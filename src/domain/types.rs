//! Fleet snapshot records as served by the AeroWaste backend.
//!
//! Decoding is lenient: a field that is missing, `null`, mistyped or spelled
//! outside its closed set decodes as `None`, and a collection element that is
//! not an object is dropped. One bad record never fails a whole snapshot.

use std::fmt;

use async_graphql::{Enum, SimpleObject};
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

// ── Status enums ───────────────────────────────────────────

/// Drone operational status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum)]
pub enum DroneStatus {
    Inactive,
    Active,
    #[serde(rename = "On Mission")]
    OnMission,
    Charging,
    Maintenance,
    Offline,
}

impl DroneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "Inactive",
            Self::Active => "Active",
            Self::OnMission => "On Mission",
            Self::Charging => "Charging",
            Self::Maintenance => "Maintenance",
            Self::Offline => "Offline",
        }
    }

    pub fn all() -> &'static [DroneStatus] {
        &[
            Self::Inactive,
            Self::Active,
            Self::OnMission,
            Self::Charging,
            Self::Maintenance,
            Self::Offline,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum)]
pub enum CameraStatus {
    #[serde(rename = "OK")]
    Ok,
    Warning,
    Error,
    Offline,
}

impl CameraStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Offline => "Offline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum)]
pub enum SignalStrength {
    Strong,
    Medium,
    Weak,
    Offline,
}

/// Base station status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum)]
pub enum BaseStatus {
    Available,
    Maintenance,
    Full,
    Offline,
}

impl BaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Maintenance => "Maintenance",
            Self::Full => "Full",
            Self::Offline => "Offline",
        }
    }

    pub fn all() -> &'static [BaseStatus] {
        &[Self::Available, Self::Maintenance, Self::Full, Self::Offline]
    }
}

impl fmt::Display for DroneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Records ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SimpleObject)]
pub struct Drone {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<DroneStatus>,
    #[serde(default, deserialize_with = "lenient")]
    pub battery: Option<u8>,
    #[serde(default, deserialize_with = "lenient")]
    pub camera_status: Option<CameraStatus>,
    #[serde(default, deserialize_with = "lenient")]
    pub signal_strength: Option<SignalStrength>,
    #[serde(default, deserialize_with = "id_ref")]
    pub route_assigned: Option<String>,
    #[serde(default, deserialize_with = "id_ref")]
    pub base_assigned: Option<String>,
}

impl Drone {
    /// Name to show operators, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SimpleObject)]
pub struct Base {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<BaseStatus>,
    #[serde(
        default,
        alias = "litter_capacity",
        deserialize_with = "lenient"
    )]
    pub litter_capacity_percent: Option<u8>,
    #[serde(default, deserialize_with = "id_seq")]
    pub drones_assigned: Vec<String>,
    #[serde(default, deserialize_with = "id_seq")]
    pub routes_assigned: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub servicing_address: Option<String>,
}

impl Base {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SimpleObject)]
pub struct Route {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "id_ref")]
    pub base_assigned: Option<String>,
    #[serde(default, deserialize_with = "id_ref")]
    pub drone_assigned: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub mission_frequency: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub distance: Option<String>,
}

// ── Lenient decoding helpers ───────────────────────────────

/// Decode any value into `Some(T)`, or `None` if it does not fit.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Decode a sequence, dropping elements that do not fit. `null` is empty.
pub(crate) fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(decode_collection(value.unwrap_or(serde_json::Value::Null)))
}

/// Ids arrive as strings (`"B_001"`) or bare numbers (`92`).
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(id_from_value).unwrap_or_default())
}

/// A reference to another record's id. Anything but a string or number is absent.
fn id_ref<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(id_from_value))
}

/// A list of id references. Elements that are not ids are dropped; `null` is empty.
fn id_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => {
            items.into_iter().filter_map(id_from_value).collect()
        }
        _ => Vec::new(),
    })
}

/// Integral floats (`92.0`) render like integers.
fn id_from_value(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 => Some(format!("{}", f)),
            _ => Some(n.to_string()),
        },
        _ => None,
    }
}

/// Decode a JSON array element-by-element. Non-arrays decode as empty.
pub fn decode_collection<T: DeserializeOwned>(value: serde_json::Value) -> Vec<T> {
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drone_wire_spellings() {
        let drone: Drone = serde_json::from_value(json!({
            "id": "D001",
            "name": "Hawk",
            "status": "On Mission",
            "battery": 64,
            "camera_status": "OK",
            "signal_strength": "Strong",
            "base_assigned": "B_001"
        }))
        .unwrap();

        assert_eq!(drone.status, Some(DroneStatus::OnMission));
        assert_eq!(drone.camera_status, Some(CameraStatus::Ok));
        assert_eq!(drone.signal_strength, Some(SignalStrength::Strong));
        assert_eq!(drone.battery, Some(64));
        assert_eq!(drone.route_assigned, None);
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let drone: Drone = serde_json::from_value(json!({ "id": 92, "battery": 9 })).unwrap();
        assert_eq!(drone.id, "92");
        assert_eq!(drone.display_name(), "92");
    }

    #[test]
    fn test_bad_fields_decode_as_absent() {
        let drone: Drone = serde_json::from_value(json!({
            "id": "D9",
            "status": "Hovering",
            "battery": "low",
            "camera_status": null
        }))
        .unwrap();

        assert_eq!(drone.status, None);
        assert_eq!(drone.battery, None);
        assert_eq!(drone.camera_status, None);
    }

    #[test]
    fn test_negative_battery_is_absent() {
        let drone: Drone = serde_json::from_value(json!({ "id": "D1", "battery": -4 })).unwrap();
        assert_eq!(drone.battery, None);
    }

    #[test]
    fn test_base_capacity_alias() {
        let base: Base = serde_json::from_value(json!({
            "id": "B_003",
            "litter_capacity": 93,
            "status": "Full"
        }))
        .unwrap();
        assert_eq!(base.litter_capacity_percent, Some(93));
        assert_eq!(base.status, Some(BaseStatus::Full));
        assert!(base.drones_assigned.is_empty());
    }

    #[test]
    fn test_collection_skips_non_objects() {
        let bases: Vec<Base> = decode_collection(json!([
            { "id": "B_001", "litter_capacity_percent": 12 },
            "garbage",
            null,
            { "id": "B_002", "drones_assigned": ["D002", 7] }
        ]));

        assert_eq!(bases.len(), 2);
        assert_eq!(
            bases[1].drones_assigned,
            vec!["D002".to_string(), "7".to_string()]
        );
    }

    #[test]
    fn test_numeric_references_are_stringified() {
        let route: Route = serde_json::from_value(json!({
            "id": "R_001_N",
            "drone_assigned": 92,
            "base_assigned": "B_001"
        }))
        .unwrap();
        assert_eq!(route.drone_assigned.as_deref(), Some("92"));
        assert_eq!(route.base_assigned.as_deref(), Some("B_001"));

        let base: Base = serde_json::from_value(json!({
            "id": "B_001",
            "drones_assigned": [92, 81, null, { "id": 3 }],
            "routes_assigned": null
        }))
        .unwrap();
        assert_eq!(base.drones_assigned, vec!["92".to_string(), "81".to_string()]);
        assert!(base.routes_assigned.is_empty());

        let drone: Drone =
            serde_json::from_value(json!({ "id": 81, "route_assigned": true, "base_assigned": 1 }))
                .unwrap();
        assert_eq!(drone.route_assigned, None);
        assert_eq!(drone.base_assigned.as_deref(), Some("1"));
    }

    #[test]
    fn test_integral_float_id_has_no_fraction() {
        let drone: Drone = serde_json::from_value(json!({ "id": 92.0 })).unwrap();
        assert_eq!(drone.id, "92");
        let drone: Drone = serde_json::from_value(json!({ "id": 9.5 })).unwrap();
        assert_eq!(drone.id, "9.5");
    }

    #[test]
    fn test_collection_non_array_is_empty() {
        let drones: Vec<Drone> = decode_collection(json!({ "detail": "oops" }));
        assert!(drones.is_empty());
        let drones: Vec<Drone> = decode_collection(serde_json::Value::Null);
        assert!(drones.is_empty());
    }
}
