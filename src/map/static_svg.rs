//! Illustrative route sketch
//!
//! No network calls. Markers sit at fixed pixel positions in a 400x280 view
//! box and the path is a fixed curve; geography is not represented.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use super::{MapRenderer, MapScene, Marker, MarkerPosition, MarkerRole, ScenePath};
use crate::config::MapProvider;
use crate::models::Waypoint;

pub const VIEW_BOX_WIDTH: u32 = 400;
pub const VIEW_BOX_HEIGHT: u32 = 280;

const ROUTE_PATH: &str = "M 60 60 Q 120 100 180 120 Q 240 140 340 180";
const ORIGIN_POSITION: (f64, f64) = (32.0, 32.0);
const DESTINATION_POSITION: (f64, f64) = (368.0, 128.0);
/// Third and later waypoints share the last slot
const WAYPOINT_POSITIONS: [(f64, f64); 3] = [(128.0, 64.0), (192.0, 96.0), (224.0, 128.0)];

#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSvgRenderer;

impl StaticSvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn scene(&self, origin: &str, destination: &str, waypoints: &[Waypoint]) -> MapScene {
        let mut markers = Vec::with_capacity(waypoints.len() + 2);
        markers.push(Marker::origin(origin, pixel(ORIGIN_POSITION)));
        for (index, waypoint) in waypoints.iter().enumerate() {
            let slot = WAYPOINT_POSITIONS[index.min(WAYPOINT_POSITIONS.len() - 1)];
            markers.push(Marker::waypoint(waypoint, pixel(slot)));
        }
        markers.push(Marker::destination(destination, pixel(DESTINATION_POSITION)));

        MapScene {
            provider: MapProvider::Static,
            markers,
            path: ScenePath::Svg(ROUTE_PATH.to_string()),
            distance_km: None,
        }
    }
}

#[async_trait]
impl MapRenderer for StaticSvgRenderer {
    fn provider(&self) -> MapProvider {
        MapProvider::Static
    }

    async fn render(&self, origin: &str, destination: &str, waypoints: &[Waypoint]) -> MapScene {
        self.scene(origin, destination, waypoints)
    }
}

fn pixel((x, y): (f64, f64)) -> MarkerPosition {
    MarkerPosition::Pixel { x, y }
}

#[derive(Serialize)]
struct Svg {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "@viewBox")]
    view_box: String,
    #[serde(rename = "@width")]
    width: u32,
    #[serde(rename = "@height")]
    height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<SvgPath>,
    circle: Vec<SvgCircle>,
    text: Vec<SvgText>,
}

#[derive(Serialize)]
struct SvgPath {
    #[serde(rename = "@d")]
    d: String,
    #[serde(rename = "@stroke")]
    stroke: &'static str,
    #[serde(rename = "@stroke-width")]
    stroke_width: u32,
    #[serde(rename = "@stroke-dasharray")]
    stroke_dasharray: &'static str,
    #[serde(rename = "@fill")]
    fill: &'static str,
}

#[derive(Serialize)]
struct SvgCircle {
    #[serde(rename = "@cx")]
    cx: f64,
    #[serde(rename = "@cy")]
    cy: f64,
    #[serde(rename = "@r")]
    r: u32,
    #[serde(rename = "@fill")]
    fill: String,
}

#[derive(Serialize)]
struct SvgText {
    #[serde(rename = "@x")]
    x: f64,
    #[serde(rename = "@y")]
    y: f64,
    #[serde(rename = "@font-size")]
    font_size: u32,
    #[serde(rename = "$text")]
    content: String,
}

/// Render the pixel markers and SVG path of a scene as a standalone SVG document.
/// Geographic markers are skipped.
pub fn to_svg(scene: &MapScene) -> Result<String> {
    let mut circles = Vec::new();
    let mut texts = Vec::new();

    for marker in &scene.markers {
        let MarkerPosition::Pixel { x, y } = marker.position else {
            continue;
        };

        let (radius, fill) = match marker.role {
            MarkerRole::Origin => (10, "#2563eb".to_string()),
            MarkerRole::Destination => (10, "#f97316".to_string()),
            MarkerRole::Waypoint => (
                7,
                marker
                    .road_color
                    .clone()
                    .unwrap_or_else(|| "#6b7280".to_string()),
            ),
        };
        circles.push(SvgCircle {
            cx: x,
            cy: y,
            r: radius,
            fill,
        });

        if marker.has_alerts {
            circles.push(SvgCircle {
                cx: x + 6.0,
                cy: y - 6.0,
                r: 3,
                fill: "#dc2626".to_string(),
            });
        }

        let caption = match (marker.weather_icon, marker.temperature) {
            (Some(icon), Some(temperature)) => {
                format!("{} · {} {}°C", marker.label, icon, temperature)
            }
            _ => marker.label.clone(),
        };
        texts.push(SvgText {
            x,
            y: y + 22.0,
            font_size: 11,
            content: caption,
        });
    }

    let path = match &scene.path {
        ScenePath::Svg(d) => Some(SvgPath {
            d: d.clone(),
            stroke: "#2563eb",
            stroke_width: 4,
            stroke_dasharray: "8,4",
            fill: "none",
        }),
        _ => None,
    };

    let svg = Svg {
        xmlns: "http://www.w3.org/2000/svg",
        view_box: format!("0 0 {VIEW_BOX_WIDTH} {VIEW_BOX_HEIGHT}"),
        width: VIEW_BOX_WIDTH,
        height: VIEW_BOX_HEIGHT,
        path,
        circle: circles,
        text: texts,
    };

    quick_xml::se::to_string_with_root("svg", &svg).context("Failed to serialize route sketch")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoadStatus;
    use crate::route::RouteSimulator;

    #[tokio::test]
    async fn test_static_scene_layout() {
        let route = RouteSimulator::new().plan("Indore");
        let renderer = StaticSvgRenderer::new();
        let scene = renderer
            .render(&route.origin, &route.destination, &route.waypoints)
            .await;

        assert_eq!(scene.provider, MapProvider::Static);
        assert_eq!(scene.markers.len(), 5);
        assert_eq!(scene.path, ScenePath::Svg(ROUTE_PATH.to_string()));
        assert_eq!(
            scene.marker(MarkerRole::Origin).unwrap().position,
            MarkerPosition::Pixel { x: 32.0, y: 32.0 }
        );
        assert_eq!(
            scene.marker(MarkerRole::Destination).unwrap().label,
            "Indore, India"
        );
    }

    #[test]
    fn test_extra_waypoints_share_last_slot() {
        let route = RouteSimulator::new().plan("Indore");
        let mut waypoints = route.waypoints.clone();
        waypoints.push(route.waypoints[0].clone());

        let scene = StaticSvgRenderer::new().scene("A", "B", &waypoints);
        let positions: Vec<MarkerPosition> =
            scene.waypoint_markers().map(|m| m.position).collect();
        assert_eq!(positions[2], positions[3]);
    }

    #[test]
    fn test_svg_document() {
        let route = RouteSimulator::new().plan("Indore");
        let scene = StaticSvgRenderer::new().scene("Bhopal & Co", "Indore", &route.waypoints);
        let svg = to_svg(&scene).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 400 280""#));
        assert!(svg.contains(ROUTE_PATH));
        assert!(svg.contains("Bhopal &amp; Co"));
        assert!(svg.contains("Dewas"));
        assert!(svg.contains(RoadStatus::Poor.color()));
    }
}
