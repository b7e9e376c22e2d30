//! Civic complaint model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinates;
use crate::SafePathError;

/// Issue categories a traveller can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintType {
    Pothole,
    Lighting,
    Garbage,
    Waterlogging,
    RoadBlockage,
}

impl ComplaintType {
    pub const ALL: [ComplaintType; 5] = [
        ComplaintType::Pothole,
        ComplaintType::Lighting,
        ComplaintType::Garbage,
        ComplaintType::Waterlogging,
        ComplaintType::RoadBlockage,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintType::Pothole => "pothole",
            ComplaintType::Lighting => "lighting",
            ComplaintType::Garbage => "garbage",
            ComplaintType::Waterlogging => "waterlogging",
            ComplaintType::RoadBlockage => "road_blockage",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ComplaintType::Pothole => "Pothole",
            ComplaintType::Lighting => "Street Lighting",
            ComplaintType::Garbage => "Garbage Collection",
            ComplaintType::Waterlogging => "Waterlogging",
            ComplaintType::RoadBlockage => "Road Blockage",
        }
    }
}

impl fmt::Display for ComplaintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintType {
    type Err = SafePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| SafePathError::validation(format!("Unknown issue type: {s}")))
    }
}

/// Where the issue is: typed text or a GPS fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComplaintLocation {
    Gps(Coordinates),
    Text(String),
}

impl ComplaintLocation {
    /// Text that parses as `"lat, lon"` becomes a GPS location
    #[must_use]
    pub fn from_input(input: &str) -> Self {
        match input.parse::<Coordinates>() {
            Ok(coordinates) => ComplaintLocation::Gps(coordinates),
            Err(_) => ComplaintLocation::Text(input.trim().to_string()),
        }
    }
}

impl fmt::Display for ComplaintLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplaintLocation::Gps(coordinates) => write!(f, "{coordinates}"),
            ComplaintLocation::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    Submitted,
}

/// An acknowledged complaint. Only ever lives in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComplaintType,
    pub description: String,
    pub location: ComplaintLocation,
    /// Reference to an attached photo (file name or upload key)
    pub photo: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub status: ComplaintStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complaint_type_round_trips_through_text() {
        for kind in ComplaintType::ALL {
            assert_eq!(kind.as_str().parse::<ComplaintType>().unwrap(), kind);
        }
        assert!("flooding".parse::<ComplaintType>().is_err());
    }

    #[test]
    fn test_location_from_gps_text() {
        let location = ComplaintLocation::from_input("22.7196, 75.8577");
        assert_eq!(location, ComplaintLocation::Gps(Coordinates::INDORE));

        let location = ComplaintLocation::from_input(" MG Road, Indore ");
        assert_eq!(location, ComplaintLocation::Text("MG Road, Indore".to_string()));
    }

    #[test]
    fn test_location_deserializes_either_shape() {
        let gps: ComplaintLocation =
            serde_json::from_str(r#"{"latitude": 23.2599, "longitude": 77.4126}"#).unwrap();
        assert_eq!(gps, ComplaintLocation::Gps(Coordinates::BHOPAL));

        let text: ComplaintLocation = serde_json::from_str(r#""Near bus stand""#).unwrap();
        assert_eq!(text, ComplaintLocation::Text("Near bus stand".to_string()));
    }
}
