//! Geocoding + routing renderer backed by public OpenStreetMap services
//!
//! Place names are resolved with a Nominatim search (first hit only), then an
//! OSRM driving route is requested between the two points. A failed geocode
//! falls back to the configured coordinate for that endpoint; a failed route
//! leaves the path empty and the waypoints on the straight segment.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{MapRenderer, MapScene, get_json, http_client};
use crate::config::{MapProvider, SafePathConfig};
use crate::models::{Coordinates, Waypoint};

pub struct OsrmRenderer {
    client: Client,
    geocoding_url: String,
    routing_url: String,
    fallback_origin: Coordinates,
    fallback_destination: Coordinates,
}

/// A driving route as returned by OSRM
#[derive(Debug, Clone, PartialEq)]
pub struct DrivingRoute {
    pub path: Vec<Coordinates>,
    pub distance_km: f64,
    pub duration_seconds: f64,
}

impl OsrmRenderer {
    pub fn new(config: &SafePathConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config)?,
            geocoding_url: config.geocoding.base_url.trim_end_matches('/').to_string(),
            routing_url: config.routing.base_url.trim_end_matches('/').to_string(),
            fallback_origin: config.map.fallback_origin,
            fallback_destination: config.map.fallback_destination,
        })
    }

    /// Resolve a place name to the geocoder's first match
    #[instrument(skip(self))]
    pub async fn geocode(&self, place: &str) -> Result<Coordinates> {
        let url = format!(
            "{}/search?format=json&limit=1&q={}",
            self.geocoding_url,
            urlencoding::encode(place)
        );

        let results: Vec<NominatimPlace> = get_json(&self.client, url, "geocoding").await?;

        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No geocoding match for '{place}'"))?;

        let coordinates = Coordinates::new(
            first.lat.parse().context("Invalid latitude in geocoding response")?,
            first.lon.parse().context("Invalid longitude in geocoding response")?,
        );
        debug!("Geocoded '{}' to {}", place, coordinates);
        Ok(coordinates)
    }

    /// Request a driving route between two points
    #[instrument(skip(self))]
    pub async fn route(&self, from: Coordinates, to: Coordinates) -> Result<DrivingRoute> {
        let url = format!(
            "{}/route/v1/driving/{};{}?overview=full&geometries=geojson",
            self.routing_url,
            from.to_lon_lat(),
            to.to_lon_lat()
        );

        let body: OsrmResponse = get_json(&self.client, url, "routing").await?;

        if body.code != "Ok" {
            return Err(anyhow!("Routing service answered {}", body.code));
        }

        let route = body
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No routes in response"))?;

        Ok(DrivingRoute {
            path: route
                .geometry
                .coordinates
                .into_iter()
                .map(|[lon, lat]| Coordinates::new(lat, lon))
                .collect(),
            distance_km: route.distance / 1000.0,
            duration_seconds: route.duration,
        })
    }

    /// Geocode, or fall back to fixed coordinates
    async fn resolve(&self, place: &str, fallback: Coordinates) -> Coordinates {
        match self.geocode(place).await {
            Ok(coordinates) => coordinates,
            Err(e) => {
                warn!("Geocoding '{}' failed, using fallback {}: {:#}", place, fallback, e);
                fallback
            }
        }
    }
}

#[async_trait]
impl MapRenderer for OsrmRenderer {
    fn provider(&self) -> MapProvider {
        MapProvider::Osrm
    }

    async fn render(&self, origin: &str, destination: &str, waypoints: &[Waypoint]) -> MapScene {
        let (from, to) = tokio::join!(
            self.resolve(origin, self.fallback_origin),
            self.resolve(destination, self.fallback_destination)
        );

        let (path, distance_km) = match self.route(from, to).await {
            Ok(route) => {
                info!(
                    "Route {} -> {}: {:.1} km, {} points",
                    origin,
                    destination,
                    route.distance_km,
                    route.path.len()
                );
                (route.path, route.distance_km)
            }
            Err(e) => {
                warn!("Routing {} -> {} failed: {:#}", origin, destination, e);
                (Vec::new(), from.distance_km(&to))
            }
        };

        MapScene::along_path(
            MapProvider::Osrm,
            (origin, from),
            (destination, to),
            waypoints,
            path,
            Some(distance_km),
        )
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters
    distance: f64,
    /// Seconds
    duration: f64,
    geometry: GeoJsonLine,
}

#[derive(Debug, Deserialize)]
struct GeoJsonLine {
    coordinates: Vec<[f64; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{MarkerPosition, MarkerRole, ScenePath};
    use crate::route::RouteSimulator;

    /// Points every provider at a closed local port so each request fails fast
    fn unreachable_config() -> SafePathConfig {
        let mut config = SafePathConfig::default();
        config.geocoding.base_url = "http://127.0.0.1:9".to_string();
        config.routing.base_url = "http://127.0.0.1:9".to_string();
        config
    }

    #[test]
    fn test_osrm_body_parses() {
        let body: OsrmResponse = serde_json::from_str(
            r#"{"code":"Ok","routes":[{"distance":194000.0,"duration":13200.0,
                "geometry":{"type":"LineString","coordinates":[[77.41,23.26],[75.86,22.72]]}}]}"#,
        )
        .unwrap();
        assert_eq!(body.routes[0].geometry.coordinates[0], [77.41, 23.26]);
    }

    #[test]
    fn test_nominatim_body_parses() {
        let places: Vec<NominatimPlace> =
            serde_json::from_str(r#"[{"lat":"23.2584857","lon":"77.401989","display_name":"Bhopal"}]"#)
                .unwrap();
        assert_eq!(places[0].lat, "23.2584857");
    }

    #[tokio::test]
    async fn test_unreachable_services_use_fallback_coordinates() {
        let renderer = OsrmRenderer::new(&unreachable_config()).unwrap();
        let route = RouteSimulator::new().plan("Indore");

        let scene = renderer
            .render("Bhopal, India", "Indore, India", &route.waypoints)
            .await;

        assert_eq!(
            scene.marker(MarkerRole::Origin).unwrap().position,
            MarkerPosition::from(Coordinates::BHOPAL)
        );
        assert_eq!(
            scene.marker(MarkerRole::Destination).unwrap().position,
            MarkerPosition::from(Coordinates::INDORE)
        );
        assert_eq!(scene.path, ScenePath::None);
        assert_eq!(scene.waypoint_markers().count(), 3);

        let estimate = scene.distance_km.unwrap();
        assert!((160.0..190.0).contains(&estimate), "got {estimate}");
    }
}
