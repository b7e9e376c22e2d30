//! Configuration management for the `SafePath` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SafePathError;
use crate::models::Coordinates;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the `SafePath` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SafePathConfig {
    /// Weather provider configuration
    pub weather: WeatherConfig,
    /// Geocoding provider used by the OSRM map renderer
    pub geocoding: GeocodingConfig,
    /// Routing provider used by the OSRM map renderer
    pub routing: RoutingConfig,
    /// Mapbox credentials and endpoint
    pub mapbox: MapboxConfig,
    /// Google Maps credentials and endpoint
    pub google: GoogleConfig,
    /// Map renderer selection and fallbacks
    pub map: MapConfig,
    /// Simulated route settings
    pub route: RouteConfig,
    /// Complaint submission settings
    pub complaint: ComplaintConfig,
    /// Shared HTTP client settings
    pub http: HttpConfig,
    /// Web server settings
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// OpenWeatherMap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key. Weather is disabled without it.
    pub api_key: Option<String>,
    /// Base URL for the current-weather API
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Nominatim-compatible search endpoint
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// OSRM-compatible routing endpoint
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapboxConfig {
    pub access_token: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

/// Which map renderer adapter to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapProvider {
    /// Illustrative SVG sketch, no network
    Static,
    /// Nominatim geocoding and OSRM routing
    Osrm,
    Mapbox,
    Google,
}

/// Map renderer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Renderer adapter selected at startup
    pub provider: MapProvider,
    /// Used for the origin when geocoding fails
    pub fallback_origin: Coordinates,
    /// Used for the destination when geocoding fails
    pub fallback_destination: Coordinates,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// City whose weather is fetched alongside the destination's
    pub origin_city: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplaintConfig {
    /// Simulated acknowledgement delay in milliseconds
    pub submit_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User agent sent to every provider. Nominatim rejects anonymous clients.
    pub user_agent: String,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Directory holding the application shell
    pub static_dir: String,
    /// Shell assets pre-fetched into the offline cache at startup
    pub shell_assets: Vec<String>,
    /// Per-request timeout in seconds
    pub request_timeout_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_routing_base_url() -> String {
    "https://router.project-osrm.org".to_string()
}

fn default_mapbox_base_url() -> String {
    "https://api.mapbox.com".to_string()
}

fn default_google_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

fn default_origin_city() -> String {
    "Indore, India".to_string()
}

fn default_submit_delay_ms() -> u64 {
    2000
}

fn default_user_agent() -> String {
    format!("SafePath/{}", env!("CARGO_PKG_VERSION"))
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "public".to_string()
}

fn default_shell_assets() -> Vec<String> {
    [
        "/",
        "/index.html",
        "/assets/app.js",
        "/assets/app.css",
        "/assets/hero-travel-india.jpg",
        "/favicon.ico",
        "/manifest.json",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: default_routing_base_url(),
        }
    }
}

impl Default for MapboxConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            base_url: default_mapbox_base_url(),
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_google_base_url(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            provider: MapProvider::Static,
            fallback_origin: Coordinates::BHOPAL,
            fallback_destination: Coordinates::INDORE,
        }
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            origin_city: default_origin_city(),
        }
    }
}

impl Default for ComplaintConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: default_submit_delay_ms(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
            shell_assets: default_shell_assets(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ComplaintConfig {
    #[must_use]
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

impl SafePathConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // SAFEPATH_WEATHER__API_KEY and friends
        builder = builder.add_source(
            Environment::with_prefix("SAFEPATH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SafePathConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_credential_env();
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("safepath").join("config.toml"))
    }

    /// Pick up provider credentials from their conventional variables
    fn apply_credential_env(&mut self) {
        if self.weather.api_key.is_none() {
            self.weather.api_key = std::env::var("OPENWEATHER_API_KEY").ok();
        }
        if self.mapbox.access_token.is_none() {
            self.mapbox.access_token = std::env::var("MAPBOX_ACCESS_TOKEN").ok();
        }
        if self.google.api_key.is_none() {
            self.google.api_key = std::env::var("GOOGLE_MAPS_API_KEY").ok();
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.routing.base_url.is_empty() {
            self.routing.base_url = default_routing_base_url();
        }
        if self.mapbox.base_url.is_empty() {
            self.mapbox.base_url = default_mapbox_base_url();
        }
        if self.google.base_url.is_empty() {
            self.google.base_url = default_google_base_url();
        }
        if self.route.origin_city.trim().is_empty() {
            self.route.origin_city = default_origin_city();
        }
        if self.http.user_agent.is_empty() {
            self.http.user_agent = default_user_agent();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Credentials are optional, but an empty one is a mistake
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("Weather API key", &self.weather.api_key),
            ("Mapbox access token", &self.mapbox.access_token),
            ("Google Maps API key", &self.google.api_key),
        ];

        for (name, key) in keys {
            if let Some(key) = key {
                if key.trim().is_empty() {
                    return Err(SafePathError::config(format!(
                        "{name} cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.complaint.submit_delay_ms > 60_000 {
            return Err(
                SafePathError::config("Complaint submit delay cannot exceed 60000 ms").into(),
            );
        }

        if self.server.port == 0 {
            return Err(SafePathError::config("Server port cannot be 0").into());
        }

        if self.server.request_timeout_seconds > 300 {
            return Err(
                SafePathError::config("Request timeout cannot exceed 300 seconds").into(),
            );
        }

        for (name, coordinates) in [
            ("fallback_origin", &self.map.fallback_origin),
            ("fallback_destination", &self.map.fallback_destination),
        ] {
            if !coordinates.is_valid() {
                return Err(SafePathError::config(format!(
                    "Map {name} is not a valid latitude/longitude pair"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SafePathError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SafePathError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("Weather", &self.weather.base_url),
            ("Geocoding", &self.geocoding.base_url),
            ("Routing", &self.routing.base_url),
            ("Mapbox", &self.mapbox.base_url),
            ("Google", &self.google.base_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SafePathError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
