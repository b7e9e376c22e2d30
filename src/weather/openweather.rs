//! OpenWeatherMap current-weather client

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use super::{WeatherError, WeatherOutcome, WeatherSource};
use crate::config::SafePathConfig;
use crate::models::{WeatherCondition, WeatherReading};

/// m/s to km/h
const MS_TO_KMH: f64 = 3.6;

pub struct OpenWeatherClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenWeatherClient {
    /// Create a new client. A missing API key is allowed; lookups then return nothing.
    pub fn new(config: &SafePathConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.http.user_agent.clone())
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: config.weather.api_key.clone(),
            base_url: config.weather.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch and normalize the current weather for a place name
    #[instrument(skip(self))]
    pub async fn fetch_reading(&self, location: &str) -> Result<WeatherReading, WeatherError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(WeatherError::MissingCredential)?;

        let url = format!(
            "{}/weather?q={}&appid={}&units=metric",
            self.base_url,
            urlencoding::encode(location),
            api_key
        );

        let start_time = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(
            "Weather response {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        let payload: OwmResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Malformed(e.to_string()))?;

        if !status.is_success() || payload.main.is_none() {
            return Err(WeatherError::NotFound {
                message: payload
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        normalize(location, payload)
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current(&self, location: &str) -> WeatherOutcome {
        match self.fetch_reading(location).await {
            Ok(reading) => {
                info!(
                    "Weather for {}: {} {}",
                    reading.location,
                    reading.format_temperature(),
                    reading.condition
                );
                WeatherOutcome::found(reading)
            }
            Err(WeatherError::MissingCredential) => {
                error!("OpenWeather API key is missing from configuration");
                WeatherOutcome::failed(location, &WeatherError::MissingCredential)
            }
            Err(e) => {
                warn!("Failed to fetch weather data for {}: {}", location, e);
                WeatherOutcome::failed(location, &e)
            }
        }
    }
}

/// Map a successful payload to a reading
fn normalize(query: &str, payload: OwmResponse) -> Result<WeatherReading, WeatherError> {
    let main = payload
        .main
        .ok_or_else(|| WeatherError::Malformed("missing main block".to_string()))?;
    let wind = payload
        .wind
        .ok_or_else(|| WeatherError::Malformed("missing wind block".to_string()))?;
    let weather = payload
        .weather
        .and_then(|w| w.into_iter().next())
        .ok_or_else(|| WeatherError::Malformed("missing weather entry".to_string()))?;

    let condition = WeatherCondition::from_openweather(weather.main.as_deref(), weather.id);

    Ok(WeatherReading {
        location: payload
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| query.to_string()),
        temperature: main.temp.round() as i32,
        condition,
        provider_code: weather.id,
        humidity: main.humidity.round().clamp(0.0, 100.0) as u8,
        wind_speed: (wind.speed * MS_TO_KMH).round().max(0.0) as u32,
    })
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: Option<String>,
    main: Option<OwmMain>,
    weather: Option<Vec<OwmWeather>>,
    wind: Option<OwmWind>,
    /// Present on error bodies, e.g. `"city not found"`
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    id: Option<u16>,
    main: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDORE_BODY: &str = r#"{
        "coord": {"lon": 75.8333, "lat": 22.7179},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "main": {"temp": 28.62, "feels_like": 30.1, "humidity": 62, "pressure": 1008},
        "wind": {"speed": 3.6, "deg": 270},
        "name": "Indore",
        "cod": 200
    }"#;

    fn parse(body: &str) -> OwmResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_normalize_rounds_and_converts() {
        let reading = normalize("Indore, India", parse(INDORE_BODY)).unwrap();
        assert_eq!(reading.location, "Indore");
        assert_eq!(reading.temperature, 29);
        assert_eq!(reading.condition, WeatherCondition::Cloudy);
        assert_eq!(reading.provider_code, Some(803));
        assert_eq!(reading.humidity, 62);
        // 3.6 m/s = 12.96 km/h
        assert_eq!(reading.wind_speed, 13);
    }

    #[test]
    fn test_normalize_uses_query_when_name_missing() {
        let body = r#"{
            "weather": [{"id": 500, "main": "Rain"}],
            "main": {"temp": 21.4, "humidity": 90},
            "wind": {"speed": 0.0}
        }"#;
        let reading = normalize("Dewas", parse(body)).unwrap();
        assert_eq!(reading.location, "Dewas");
        assert_eq!(reading.condition, WeatherCondition::Rainy);
        assert_eq!(reading.wind_speed, 0);
    }

    #[test]
    fn test_normalize_rejects_missing_wind() {
        let body = r#"{"weather": [{"id": 800, "main": "Clear"}], "main": {"temp": 30, "humidity": 20}}"#;
        let result = normalize("Goa", parse(body));
        assert!(matches!(result, Err(WeatherError::Malformed(_))));
    }

    #[test]
    fn test_error_body_parses() {
        let payload = parse(r#"{"cod": "404", "message": "city not found"}"#);
        assert!(payload.main.is_none());
        assert_eq!(payload.message.as_deref(), Some("city not found"));
    }

    #[tokio::test]
    async fn test_missing_key_yields_empty_outcome_without_network() {
        let config = SafePathConfig::default();
        let client = OpenWeatherClient::new(&config).unwrap();
        let outcome = client.current("Mumbai").await;
        assert!(outcome.reading.is_none());
        assert!(outcome.notice.is_none());
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        let mut config = SafePathConfig::default();
        config.weather.api_key = Some("SECRETKEY123".to_string());
        config.weather.base_url = "http://127.0.0.1:9".to_string();
        let client = OpenWeatherClient::new(&config).unwrap();

        let err = client.fetch_reading("Indore").await.unwrap_err();
        assert!(matches!(err, WeatherError::Transport(_)));
        let message = err.to_string();
        assert!(!message.contains("SECRETKEY123"), "{message}");
        assert!(!format!("{err:?}").contains("SECRETKEY123"));
    }
}
