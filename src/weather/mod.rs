//! Current-weather lookup
//!
//! A lookup is a single, independent request: no retry, no caching. Failures
//! never escape as errors. They end as an empty reading, plus a [`Notice`]
//! for the user unless the feature is simply switched off for lack of a key.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Notice, WeatherReading};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Why a lookup produced no reading
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("weather API key is not configured")]
    MissingCredential,

    /// Non-OK status, or an OK body without measurements
    #[error("provider returned no data: {message}")]
    NotFound { message: String },

    /// Carries the error with its URL stripped, the query holds the key
    #[error("request failed: {0}")]
    Transport(reqwest::Error),

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        WeatherError::Transport(e.without_url())
    }
}

impl WeatherError {
    /// The message shown to the user, if any
    #[must_use]
    pub fn notice(&self, location: &str) -> Option<Notice> {
        match self {
            WeatherError::MissingCredential => None,
            WeatherError::NotFound { message } => Some(Notice::error(
                "Weather Data Not Found",
                format!("API returned an error for {location}: {message}"),
            )),
            WeatherError::Transport(_) | WeatherError::Malformed(_) => Some(Notice::error(
                "Weather Fetch Error",
                format!("Failed to connect to weather service for {location}."),
            )),
        }
    }
}

/// Result of one lookup. At most one of the two fields is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherOutcome {
    pub reading: Option<WeatherReading>,
    pub notice: Option<Notice>,
}

impl WeatherOutcome {
    #[must_use]
    pub fn found(reading: WeatherReading) -> Self {
        Self {
            reading: Some(reading),
            notice: None,
        }
    }

    #[must_use]
    pub fn failed(location: &str, error: &WeatherError) -> Self {
        Self {
            reading: None,
            notice: error.notice(location),
        }
    }
}

/// Anything that can answer "what is the weather at this place right now"
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, location: &str) -> WeatherOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_is_silent() {
        let outcome = WeatherOutcome::failed("Goa", &WeatherError::MissingCredential);
        assert_eq!(outcome, WeatherOutcome::default());
    }

    #[test]
    fn test_not_found_notice_mentions_location() {
        let error = WeatherError::NotFound {
            message: "city not found".to_string(),
        };
        let notice = error.notice("Atlantis").unwrap();
        assert_eq!(notice.title, "Weather Data Not Found");
        assert_eq!(
            notice.description,
            "API returned an error for Atlantis: city not found"
        );
        assert!(notice.is_error());
    }

    #[test]
    fn test_malformed_notice() {
        let notice = WeatherError::Malformed("eof".to_string())
            .notice("Delhi")
            .unwrap();
        assert_eq!(notice.title, "Weather Fetch Error");
        assert!(notice.description.contains("Delhi"));
    }
}
