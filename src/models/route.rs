//! Route, alert and waypoint models

use serde::{Deserialize, Serialize};

use super::WeatherCondition;

/// Kind of hazard reported along a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Pothole,
    Construction,
    Weather,
    Traffic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAlert {
    #[serde(rename = "type")]
    pub kind: AlertType,
    pub message: String,
    pub severity: Severity,
    pub location: String,
}

/// Road surface state at a waypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadStatus {
    Good,
    Fair,
    Poor,
}

impl RoadStatus {
    /// Marker colour used by every map renderer
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            RoadStatus::Good => "#22c55e",
            RoadStatus::Fair => "#eab308",
            RoadStatus::Poor => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointWeather {
    pub condition: WeatherCondition,
    /// Degrees Celsius
    pub temperature: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadCondition {
    pub status: RoadStatus,
    pub alerts: Vec<String>,
}

/// Intermediate named stop with its weather and road snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub name: String,
    pub weather: WaypointWeather,
    pub road_condition: RoadCondition,
}

impl Waypoint {
    #[must_use]
    pub fn has_alerts(&self) -> bool {
        !self.road_condition.alerts.is_empty()
    }
}

/// A planned route. Replaced wholesale on each search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub origin: String,
    pub destination: String,
    /// Formatted, e.g. `"194 km"`
    pub distance: String,
    /// Formatted, e.g. `"3h 40m"`
    pub duration: String,
    pub alerts: Vec<RouteAlert>,
    pub waypoints: Vec<Waypoint>,
}

impl RouteInfo {
    /// Highest alert severity on the route, if any
    #[must_use]
    pub fn worst_severity(&self) -> Option<Severity> {
        self.alerts.iter().map(|a| a.severity).max()
    }

    #[must_use]
    pub fn waypoint_names(&self) -> Vec<&str> {
        self.waypoints.iter().map(|w| w.name.as_str()).collect()
    }
}
