//! Data models for the SafePath application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates
//! - Weather: Normalized current-weather readings
//! - Route: Simulated routes, alerts and waypoints
//! - Complaint: Civic complaints and their categories

pub mod complaint;
pub mod language;
pub mod location;
pub mod notice;
pub mod route;
pub mod weather;

// Re-export all public types for convenient access
pub use complaint::{Complaint, ComplaintLocation, ComplaintStatus, ComplaintType};
pub use language::Language;
pub use location::Coordinates;
pub use notice::{Notice, NoticeVariant};
pub use route::{
    AlertType, RoadCondition, RoadStatus, RouteAlert, RouteInfo, Severity, Waypoint,
    WaypointWeather,
};
pub use weather::{WeatherCondition, WeatherReading};
