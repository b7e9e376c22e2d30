//! Route map rendering
//!
//! Every provider sits behind [`MapRenderer`]. A renderer turns an origin, a
//! destination and the route's waypoints into a [`MapScene`]: one marker per
//! endpoint, one per waypoint (weather icon, road colour, alert flag) and a
//! connecting path. Rendering never fails; a provider problem degrades the
//! scene (fallback coordinates, missing path, or a blank map).

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{MapProvider, SafePathConfig};
use crate::models::{Coordinates, RoadStatus, WeatherCondition, Waypoint};

pub mod google;
pub mod mapbox;
pub mod osrm;
pub mod static_svg;
pub mod view;

pub use google::GoogleRenderer;
pub use mapbox::MapboxRenderer;
pub use osrm::OsrmRenderer;
pub use static_svg::StaticSvgRenderer;
pub use view::{EngineHandle, EngineTracker, MapView};

#[async_trait]
pub trait MapRenderer: Send + Sync {
    fn provider(&self) -> MapProvider;

    async fn render(&self, origin: &str, destination: &str, waypoints: &[Waypoint]) -> MapScene;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerRole {
    Origin,
    Destination,
    Waypoint,
}

/// Geographic coordinates, or pixels in the static sketch's view box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MarkerPosition {
    Geo {
        latitude: f64,
        longitude: f64,
    },
    Pixel {
        x: f64,
        y: f64,
    },
}

impl From<Coordinates> for MarkerPosition {
    fn from(c: Coordinates) -> Self {
        MarkerPosition::Geo {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub role: MarkerRole,
    pub label: String,
    pub position: MarkerPosition,
    pub weather_icon: Option<WeatherCondition>,
    pub temperature: Option<i32>,
    pub road_status: Option<RoadStatus>,
    /// CSS colour for the road-condition dot
    pub road_color: Option<String>,
    pub has_alerts: bool,
}

impl Marker {
    pub fn origin(label: &str, position: impl Into<MarkerPosition>) -> Self {
        Self::endpoint(MarkerRole::Origin, label, position.into())
    }

    pub fn destination(label: &str, position: impl Into<MarkerPosition>) -> Self {
        Self::endpoint(MarkerRole::Destination, label, position.into())
    }

    pub fn waypoint(waypoint: &Waypoint, position: impl Into<MarkerPosition>) -> Self {
        let status = waypoint.road_condition.status;
        Self {
            role: MarkerRole::Waypoint,
            label: waypoint.name.clone(),
            position: position.into(),
            weather_icon: Some(waypoint.weather.condition),
            temperature: Some(waypoint.weather.temperature),
            road_status: Some(status),
            road_color: Some(status.color().to_string()),
            has_alerts: waypoint.has_alerts(),
        }
    }

    fn endpoint(role: MarkerRole, label: &str, position: MarkerPosition) -> Self {
        Self {
            role,
            label: label.to_string(),
            position,
            weather_icon: None,
            temperature: None,
            road_status: None,
            road_color: None,
            has_alerts: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum ScenePath {
    None,
    /// Ordered coordinates from a routing provider
    Polyline(Vec<Coordinates>),
    /// SVG path data in the static sketch's view box
    Svg(String),
}

/// Everything a front-end needs to draw the route map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapScene {
    pub provider: MapProvider,
    pub markers: Vec<Marker>,
    pub path: ScenePath,
    pub distance_km: Option<f64>,
}

impl MapScene {
    /// A map with nothing drawn on it
    #[must_use]
    pub fn blank(provider: MapProvider) -> Self {
        Self {
            provider,
            markers: Vec::new(),
            path: ScenePath::None,
            distance_km: None,
        }
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.markers.is_empty() && self.path == ScenePath::None
    }

    #[must_use]
    pub fn marker(&self, role: MarkerRole) -> Option<&Marker> {
        self.markers.iter().find(|m| m.role == role)
    }

    pub fn waypoint_markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers
            .iter()
            .filter(|m| m.role == MarkerRole::Waypoint)
    }

    /// Scene for a geographic path: endpoint markers plus waypoints spread along it
    #[must_use]
    pub fn along_path(
        provider: MapProvider,
        origin: (&str, Coordinates),
        destination: (&str, Coordinates),
        waypoints: &[Waypoint],
        path: Vec<Coordinates>,
        distance_km: Option<f64>,
    ) -> Self {
        let positions = spread_along(&path, origin.1, destination.1, waypoints.len());

        let mut markers = Vec::with_capacity(waypoints.len() + 2);
        markers.push(Marker::origin(origin.0, origin.1));
        markers.extend(
            waypoints
                .iter()
                .zip(positions)
                .map(|(waypoint, position)| Marker::waypoint(waypoint, position)),
        );
        markers.push(Marker::destination(destination.0, destination.1));

        Self {
            provider,
            markers,
            path: if path.is_empty() {
                ScenePath::None
            } else {
                ScenePath::Polyline(path)
            },
            distance_km,
        }
    }
}

/// Evenly spaced positions for `count` waypoints.
///
/// Uses the path's own vertices when there is one, otherwise the straight
/// segment between the endpoints.
#[must_use]
pub fn spread_along(
    path: &[Coordinates],
    from: Coordinates,
    to: Coordinates,
    count: usize,
) -> Vec<Coordinates> {
    (1..=count)
        .map(|i| {
            if path.is_empty() {
                from.lerp(&to, i as f64 / (count + 1) as f64)
            } else {
                let index = (i * path.len() / (count + 1)).min(path.len() - 1);
                path[index]
            }
        })
        .collect()
}

pub(crate) fn http_client(config: &SafePathConfig) -> Result<Client> {
    Client::builder()
        .user_agent(config.http.user_agent.clone())
        .build()
        .with_context(|| "Failed to create HTTP client")
}

/// GET a JSON body. Errors drop the request URL, which may carry a credential.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: String,
    what: &str,
) -> Result<T> {
    client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(reqwest::Error::without_url)
        .with_context(|| format!("{what} request failed"))?
        .json()
        .await
        .map_err(reqwest::Error::without_url)
        .with_context(|| format!("Failed to parse {what} response"))
}

/// Build the renderer named in the configuration
pub fn renderer_for(config: &SafePathConfig) -> Result<Arc<dyn MapRenderer>> {
    let renderer: Arc<dyn MapRenderer> = match config.map.provider {
        MapProvider::Static => Arc::new(StaticSvgRenderer::new()),
        MapProvider::Osrm => Arc::new(OsrmRenderer::new(config)?),
        MapProvider::Mapbox => Arc::new(MapboxRenderer::new(config)?),
        MapProvider::Google => Arc::new(GoogleRenderer::new(config)?),
    };
    tracing::info!("Using {:?} map renderer", renderer.provider());
    Ok(renderer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteSimulator;

    #[test]
    fn test_spread_along_straight_segment() {
        let from = Coordinates::new(0.0, 0.0);
        let to = Coordinates::new(0.0, 4.0);
        let points = spread_along(&[], from, to, 3);
        assert_eq!(
            points,
            vec![
                Coordinates::new(0.0, 1.0),
                Coordinates::new(0.0, 2.0),
                Coordinates::new(0.0, 3.0),
            ]
        );
    }

    #[test]
    fn test_spread_along_path_vertices() {
        let path: Vec<Coordinates> = (0..8).map(|i| Coordinates::new(i as f64, 0.0)).collect();
        let points = spread_along(&path, path[0], path[7], 3);
        assert_eq!(
            points.iter().map(|c| c.latitude).collect::<Vec<_>>(),
            vec![2.0, 4.0, 6.0]
        );
    }

    #[test]
    fn test_spread_along_single_vertex_path() {
        let path = vec![Coordinates::BHOPAL];
        let points = spread_along(&path, Coordinates::BHOPAL, Coordinates::INDORE, 2);
        assert_eq!(points, vec![Coordinates::BHOPAL, Coordinates::BHOPAL]);
    }

    #[test]
    fn test_along_path_marker_order() {
        let route = RouteSimulator::new().plan("Indore");
        let scene = MapScene::along_path(
            MapProvider::Osrm,
            ("Bhopal", Coordinates::BHOPAL),
            ("Indore", Coordinates::INDORE),
            &route.waypoints,
            Vec::new(),
            None,
        );
        let roles: Vec<MarkerRole> = scene.markers.iter().map(|m| m.role).collect();
        assert_eq!(roles.first(), Some(&MarkerRole::Origin));
        assert_eq!(roles.last(), Some(&MarkerRole::Destination));
        assert_eq!(scene.waypoint_markers().count(), 3);
        assert_eq!(scene.path, ScenePath::None);
        assert!(!scene.is_blank());

        let ashta = scene.waypoint_markers().nth(1).unwrap();
        assert_eq!(ashta.label, "Ashta");
        assert_eq!(ashta.road_color.as_deref(), Some(RoadStatus::Fair.color()));
        assert!(ashta.has_alerts);
    }

    #[test]
    fn test_renderer_for_static_config() {
        let config = SafePathConfig::default();
        let renderer = renderer_for(&config).unwrap();
        assert_eq!(renderer.provider(), MapProvider::Static);
    }
}
