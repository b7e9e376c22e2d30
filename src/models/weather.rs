//! Weather reading model and the canonical condition mapping

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical weather condition.
///
/// OpenWeatherMap reports both a group name (`weather[0].main`) and a numeric
/// condition id. The group name is tried first; the id decides when the name
/// is unknown. See [`WeatherCondition::from_openweather`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    Stormy,
    Snowy,
    Foggy,
}

impl WeatherCondition {
    /// Map an OpenWeatherMap group name, e.g. `"Clouds"`
    #[must_use]
    pub fn from_group(main: &str) -> Option<Self> {
        match main.to_lowercase().as_str() {
            "clear" => Some(Self::Sunny),
            "clouds" => Some(Self::Cloudy),
            "rain" | "drizzle" => Some(Self::Rainy),
            "thunderstorm" => Some(Self::Stormy),
            "snow" => Some(Self::Snowy),
            "mist" | "smoke" | "haze" | "dust" | "fog" | "sand" | "ash" | "squall"
            | "tornado" => Some(Self::Foggy),
            _ => None,
        }
    }

    /// Map an OpenWeatherMap condition id, e.g. `802`
    #[must_use]
    pub fn from_code(code: u16) -> Self {
        match code {
            200..=299 => Self::Stormy,
            300..=399 | 500..=599 => Self::Rainy,
            600..=699 => Self::Snowy,
            700..=799 => Self::Foggy,
            801..=809 => Self::Cloudy,
            _ => Self::Sunny,
        }
    }

    /// Group name first, numeric id as fallback, sunny if neither is known
    #[must_use]
    pub fn from_openweather(main: Option<&str>, code: Option<u16>) -> Self {
        main.and_then(Self::from_group)
            .or_else(|| code.map(Self::from_code))
            .unwrap_or(Self::Sunny)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Stormy => "stormy",
            Self::Snowy => "snowy",
            Self::Foggy => "foggy",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current weather for one queried place
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    /// Place name as reported by the provider
    pub location: String,
    /// Temperature in whole degrees Celsius
    pub temperature: i32,
    pub condition: WeatherCondition,
    /// Raw provider condition id, when the provider sent one
    pub provider_code: Option<u16>,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Wind speed in whole km/h
    pub wind_speed: u32,
}

impl WeatherReading {
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", self.temperature)
    }

    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{} km/h wind", self.wind_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Clear", WeatherCondition::Sunny)]
    #[case("Clouds", WeatherCondition::Cloudy)]
    #[case("Drizzle", WeatherCondition::Rainy)]
    #[case("Thunderstorm", WeatherCondition::Stormy)]
    #[case("Haze", WeatherCondition::Foggy)]
    fn test_group_mapping(#[case] main: &str, #[case] expected: WeatherCondition) {
        assert_eq!(WeatherCondition::from_group(main), Some(expected));
    }

    #[rstest]
    #[case(211, WeatherCondition::Stormy)]
    #[case(521, WeatherCondition::Rainy)]
    #[case(601, WeatherCondition::Snowy)]
    #[case(741, WeatherCondition::Foggy)]
    #[case(800, WeatherCondition::Sunny)]
    #[case(803, WeatherCondition::Cloudy)]
    fn test_code_mapping(#[case] code: u16, #[case] expected: WeatherCondition) {
        assert_eq!(WeatherCondition::from_code(code), expected);
    }

    #[test]
    fn test_unknown_group_falls_back_to_code() {
        let condition = WeatherCondition::from_openweather(Some("Volcanic"), Some(502));
        assert_eq!(condition, WeatherCondition::Rainy);
        assert_eq!(
            WeatherCondition::from_openweather(None, None),
            WeatherCondition::Sunny
        );
    }

    #[test]
    fn test_reading_serializes_camel_case() {
        let reading = WeatherReading {
            location: "Indore".to_string(),
            temperature: 29,
            condition: WeatherCondition::Cloudy,
            provider_code: Some(803),
            humidity: 61,
            wind_speed: 13,
        };
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["windSpeed"], 13);
        assert_eq!(json["condition"], "cloudy");
        assert_eq!(reading.format_temperature(), "29°C");
    }
}
