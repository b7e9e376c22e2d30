//! `SafePath` - travel companion for India
//!
//! Route planning with weather and road alerts along the way, a civic
//! complaint form and a bilingual UI, served as a JSON API next to the
//! application shell.

pub mod api;
pub mod app;
pub mod complaint;
pub mod config;
pub mod error;
pub mod forms;
pub mod map;
pub mod models;
pub mod route;
pub mod shell;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use app::{AppState, Orchestrator};
pub use complaint::{ComplaintDraft, ComplaintService};
pub use config::{MapProvider, SafePathConfig};
pub use error::SafePathError;
pub use forms::DestinationQuery;
pub use map::{MapRenderer, MapScene, MapView};
pub use models::{Complaint, Coordinates, Language, Notice, RouteInfo, WeatherReading};
pub use route::RouteSimulator;
pub use weather::{OpenWeatherClient, WeatherOutcome, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SafePathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
