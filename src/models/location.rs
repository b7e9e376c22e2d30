//! Location model for geographic coordinates and metadata

use std::fmt;
use std::str::FromStr;

use haversine::{Location as HaversineLocation, Units, distance};
use serde::{Deserialize, Serialize};

use crate::SafePathError;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Fallback used for the route origin when geocoding fails
    pub const BHOPAL: Coordinates = Coordinates {
        latitude: 23.2599,
        longitude: 77.4126,
    };

    /// Fallback used for the route destination when geocoding fails
    pub const INDORE: Coordinates = Coordinates {
        latitude: 22.7196,
        longitude: 75.8577,
    };

    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and within WGS84 bounds
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let from = HaversineLocation {
            latitude: self.latitude,
            longitude: self.longitude,
        };
        let to = HaversineLocation {
            latitude: other.latitude,
            longitude: other.longitude,
        };
        distance(from, to, Units::Kilometers)
    }

    /// Linear interpolation towards `other`, `t` in `0.0..=1.0`
    #[must_use]
    pub fn lerp(&self, other: &Coordinates, t: f64) -> Coordinates {
        Coordinates {
            latitude: self.latitude + (other.latitude - self.latitude) * t,
            longitude: self.longitude + (other.longitude - self.longitude) * t,
        }
    }

    /// `lon,lat` as OSRM and Mapbox expect it in URL paths
    #[must_use]
    pub fn to_lon_lat(&self) -> String {
        format!("{},{}", self.longitude, self.latitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Parses the `"lat, lon"` text produced by a GPS fix
impl FromStr for Coordinates {
    type Err = SafePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| SafePathError::validation(format!("Not a coordinate pair: {s}")))?;

        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| SafePathError::validation(format!("Invalid latitude: {}", lat.trim())))?;
        let longitude: f64 = lon.trim().parse().map_err(|_| {
            SafePathError::validation(format!("Invalid longitude: {}", lon.trim()))
        })?;

        let coordinates = Coordinates::new(latitude, longitude);
        if !coordinates.is_valid() {
            return Err(SafePathError::validation(format!(
                "Coordinates out of range: {s}"
            )));
        }
        Ok(coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gps_text() {
        let coordinates: Coordinates = "23.2599, 77.4126".parse().unwrap();
        assert_eq!(coordinates, Coordinates::BHOPAL);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("Bhopal".parse::<Coordinates>().is_err());
        assert!("abc, 77.1".parse::<Coordinates>().is_err());
        assert!("95.0, 77.1".parse::<Coordinates>().is_err());
    }

    #[test]
    fn test_distance_bhopal_indore() {
        let km = Coordinates::BHOPAL.distance_km(&Coordinates::INDORE);
        assert!((160.0..190.0).contains(&km), "got {km}");
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(10.0, 20.0);
        assert_eq!(a.lerp(&b, 0.5), Coordinates::new(5.0, 10.0));
    }

    #[test]
    fn test_lon_lat_order() {
        assert_eq!(Coordinates::new(1.5, 2.5).to_lon_lat(), "2.5,1.5");
    }
}
