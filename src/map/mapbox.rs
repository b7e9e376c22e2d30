//! Mapbox renderer: Mapbox geocoding then the driving directions API.
//! Any failure, including a missing access token, leaves the map blank.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, instrument};

use super::{MapRenderer, MapScene, get_json, http_client};
use crate::config::{MapProvider, SafePathConfig};
use crate::models::{Coordinates, Waypoint};

pub struct MapboxRenderer {
    client: Client,
    access_token: Option<String>,
    base_url: String,
}

impl MapboxRenderer {
    pub fn new(config: &SafePathConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config)?,
            access_token: config.mapbox.access_token.clone(),
            base_url: config.mapbox.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[instrument(skip(self, token))]
    async fn geocode(&self, token: &str, place: &str) -> Result<Coordinates> {
        let url = format!(
            "{}/geocoding/v5/mapbox.places/{}.json?limit=1&access_token={}",
            self.base_url,
            urlencoding::encode(place),
            token
        );
        let body: GeocodingResponse = get_json(&self.client, url, "Mapbox geocoding").await?;

        let [lon, lat] = body
            .features
            .first()
            .ok_or_else(|| anyhow!("No Mapbox match for '{place}'"))?
            .center;
        Ok(Coordinates::new(lat, lon))
    }

    #[instrument(skip(self, token))]
    async fn directions(
        &self,
        token: &str,
        from: Coordinates,
        to: Coordinates,
    ) -> Result<(Vec<Coordinates>, f64)> {
        let url = format!(
            "{}/directions/v5/mapbox/driving/{};{}?geometries=geojson&overview=full&access_token={}",
            self.base_url,
            from.to_lon_lat(),
            to.to_lon_lat(),
            token
        );
        let body: DirectionsResponse = get_json(&self.client, url, "Mapbox directions").await?;

        let route = body
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Mapbox returned no routes ({})", body.code))?;

        let path = route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Coordinates::new(lat, lon))
            .collect();
        Ok((path, route.distance / 1000.0))
    }

    async fn try_render(
        &self,
        token: &str,
        origin: &str,
        destination: &str,
        waypoints: &[Waypoint],
    ) -> Result<MapScene> {
        let (from, to) = tokio::join!(self.geocode(token, origin), self.geocode(token, destination));
        let (from, to) = (from?, to?);
        let (path, distance_km) = self.directions(token, from, to).await?;

        Ok(MapScene::along_path(
            MapProvider::Mapbox,
            (origin, from),
            (destination, to),
            waypoints,
            path,
            Some(distance_km),
        ))
    }
}

#[async_trait]
impl MapRenderer for MapboxRenderer {
    fn provider(&self) -> MapProvider {
        MapProvider::Mapbox
    }

    async fn render(&self, origin: &str, destination: &str, waypoints: &[Waypoint]) -> MapScene {
        let Some(token) = self.access_token.as_deref() else {
            error!("Mapbox access token is not configured");
            return MapScene::blank(MapProvider::Mapbox);
        };

        match self.try_render(token, origin, destination, waypoints).await {
            Ok(scene) => scene,
            Err(e) => {
                error!("Error fetching Mapbox directions: {:#}", e);
                MapScene::blank(MapProvider::Mapbox)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    features: Vec<GeocodingFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodingFeature {
    /// `[lon, lat]`
    center: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    code: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    distance: f64,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<[f64; 2]>,
}
