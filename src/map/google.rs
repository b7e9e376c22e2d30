//! Google Directions renderer
//!
//! Origin, destination and waypoint names go straight to the Directions API,
//! waypoints as stopovers. Leg endpoints place the markers; step endpoints
//! form the path.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, instrument};

use super::{MapRenderer, MapScene, Marker, ScenePath, get_json, http_client};
use crate::config::{MapProvider, SafePathConfig};
use crate::models::{Coordinates, Waypoint};

pub struct GoogleRenderer {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GoogleRenderer {
    pub fn new(config: &SafePathConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config)?,
            api_key: config.google.api_key.clone(),
            base_url: config.google.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn directions_url(
        &self,
        api_key: &str,
        origin: &str,
        destination: &str,
        waypoints: &[Waypoint],
    ) -> String {
        let mut url = format!(
            "{}/directions/json?origin={}&destination={}&mode=driving&key={}",
            self.base_url,
            urlencoding::encode(origin),
            urlencoding::encode(destination),
            api_key
        );
        if !waypoints.is_empty() {
            let stops: Vec<String> = waypoints
                .iter()
                .map(|w| urlencoding::encode(&w.name).into_owned())
                .collect();
            url.push_str("&waypoints=");
            url.push_str(&stops.join("|"));
        }
        url
    }

    #[instrument(skip(self, api_key, waypoints))]
    async fn try_render(
        &self,
        api_key: &str,
        origin: &str,
        destination: &str,
        waypoints: &[Waypoint],
    ) -> Result<MapScene> {
        let url = self.directions_url(api_key, origin, destination, waypoints);
        let body: DirectionsResponse = get_json(&self.client, url, "Google directions").await?;

        if body.status != "OK" {
            return Err(anyhow!(
                "Directions request failed: {} {}",
                body.status,
                body.error_message.unwrap_or_default()
            ));
        }

        let route = body
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Directions response has no routes"))?;

        Ok(scene_from_legs(origin, destination, waypoints, &route.legs))
    }
}

/// Build the scene from route legs. With one leg per stopover, each
/// intermediate leg end is that waypoint's position; otherwise waypoints are
/// spread along the path.
fn scene_from_legs(
    origin: &str,
    destination: &str,
    waypoints: &[Waypoint],
    legs: &[Leg],
) -> MapScene {
    let (Some(first), Some(last)) = (legs.first(), legs.last()) else {
        return MapScene::blank(MapProvider::Google);
    };

    let mut path: Vec<Coordinates> = Vec::new();
    for step in legs.iter().flat_map(|leg| &leg.steps) {
        let start = Coordinates::from(step.start_location);
        if path.last() != Some(&start) {
            path.push(start);
        }
        path.push(step.end_location.into());
    }

    let distance_km = legs.iter().map(|leg| leg.distance.value).sum::<f64>() / 1000.0;
    let from: Coordinates = first.start_location.into();
    let to: Coordinates = last.end_location.into();

    if legs.len() == waypoints.len() + 1 {
        let mut markers = vec![Marker::origin(origin, from)];
        markers.extend(waypoints.iter().zip(legs).map(|(waypoint, leg)| {
            Marker::waypoint(waypoint, Coordinates::from(leg.end_location))
        }));
        markers.push(Marker::destination(destination, to));

        MapScene {
            provider: MapProvider::Google,
            markers,
            path: if path.is_empty() {
                ScenePath::None
            } else {
                ScenePath::Polyline(path)
            },
            distance_km: Some(distance_km),
        }
    } else {
        MapScene::along_path(
            MapProvider::Google,
            (origin, from),
            (destination, to),
            waypoints,
            path,
            Some(distance_km),
        )
    }
}

#[async_trait]
impl MapRenderer for GoogleRenderer {
    fn provider(&self) -> MapProvider {
        MapProvider::Google
    }

    async fn render(&self, origin: &str, destination: &str, waypoints: &[Waypoint]) -> MapScene {
        let Some(api_key) = self.api_key.as_deref() else {
            error!("Google Maps API key is not configured");
            return MapScene::blank(MapProvider::Google);
        };

        match self.try_render(api_key, origin, destination, waypoints).await {
            Ok(scene) => scene,
            Err(e) => {
                error!("Error fetching Google directions: {:#}", e);
                MapScene::blank(MapProvider::Google)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    distance: TextValue,
    start_location: LatLng,
    end_location: LatLng,
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    start_location: LatLng,
    end_location: LatLng,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    /// Meters
    value: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl From<LatLng> for Coordinates {
    fn from(p: LatLng) -> Self {
        Coordinates::new(p.lat, p.lng)
    }
}
