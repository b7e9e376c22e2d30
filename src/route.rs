//! Simulated route planning
//!
//! Stands in for a real directions backend: every search returns the same
//! Bhopal to Indore route. Only the first alert's location mentions the
//! searched destination.

use tracing::debug;

use crate::models::{
    AlertType, RoadCondition, RoadStatus, RouteAlert, RouteInfo, Severity, WeatherCondition,
    Waypoint, WaypointWeather,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct RouteSimulator;

impl RouteSimulator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Plan a route to `destination`. Never fails.
    #[must_use]
    pub fn plan(&self, destination: &str) -> RouteInfo {
        debug!("Simulating route to '{}'", destination);

        RouteInfo {
            origin: "Bhopal, India".to_string(),
            destination: "Indore, India".to_string(),
            distance: "194 km".to_string(),
            duration: "3h 40m".to_string(),
            alerts: vec![
                RouteAlert {
                    kind: AlertType::Pothole,
                    message: "Multiple potholes reported".to_string(),
                    severity: Severity::Medium,
                    location: format!("{} City Bypass", destination.trim()),
                },
                RouteAlert {
                    kind: AlertType::Construction,
                    message: "Road construction ongoing".to_string(),
                    severity: Severity::High,
                    location: "National Highway 48".to_string(),
                },
            ],
            waypoints: vec![
                waypoint("Sehore", WeatherCondition::Sunny, 27, RoadStatus::Good, &[]),
                waypoint(
                    "Ashta",
                    WeatherCondition::Cloudy,
                    23,
                    RoadStatus::Fair,
                    &["Minor road repairs ongoing"],
                ),
                waypoint(
                    "Dewas",
                    WeatherCondition::Rainy,
                    21,
                    RoadStatus::Poor,
                    &["Waterlogging reported", "Reduced visibility due to fog"],
                ),
            ],
        }
    }
}

fn waypoint(
    name: &str,
    condition: WeatherCondition,
    temperature: i32,
    status: RoadStatus,
    alerts: &[&str],
) -> Waypoint {
    Waypoint {
        name: name.to_string(),
        weather: WaypointWeather {
            condition,
            temperature,
        },
        road_condition: RoadCondition {
            status,
            alerts: alerts.iter().map(|a| (*a).to_string()).collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Mumbai")]
    #[case("Delhi")]
    #[case("")]
    #[case("   ")]
    #[case("दिल्ली")]
    fn test_any_destination_yields_the_fixed_route(#[case] destination: &str) {
        let route = RouteSimulator::new().plan(destination);
        assert_eq!(route.origin, "Bhopal, India");
        assert_eq!(route.destination, "Indore, India");
        assert_eq!(route.distance, "194 km");
        assert_eq!(route.alerts.len(), 2);
        assert_eq!(route.waypoint_names(), vec!["Sehore", "Ashta", "Dewas"]);
    }

    #[test]
    fn test_destination_only_shapes_first_alert() {
        let route = RouteSimulator::new().plan(" Goa ");
        assert_eq!(route.alerts[0].location, "Goa City Bypass");
        assert_eq!(route.alerts[1].location, "National Highway 48");
        assert_eq!(route.worst_severity(), Some(Severity::High));
    }

    #[test]
    fn test_waypoint_snapshots() {
        let route = RouteSimulator::new().plan("Goa");
        let dewas = &route.waypoints[2];
        assert_eq!(dewas.weather.condition, WeatherCondition::Rainy);
        assert_eq!(dewas.road_condition.status, RoadStatus::Poor);
        assert_eq!(dewas.road_condition.alerts.len(), 2);
        assert!(!route.waypoints[0].has_alerts());
    }
}
