//! Input validation for the search form

use serde::{Deserialize, Serialize};

use crate::{Result, SafePathError};

/// A destination search as typed by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DestinationQuery {
    #[serde(default)]
    pub destination: String,
}

impl DestinationQuery {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    /// The trimmed destination, or a validation error when nothing was entered
    pub fn validate(&self) -> Result<&str> {
        let destination = self.destination.trim();
        if destination.is_empty() {
            return Err(SafePathError::validation("Please enter a destination"));
        }
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Indore", "Indore")]
    #[case("  Ujjain ", "Ujjain")]
    #[case("Mumbai, Maharashtra", "Mumbai, Maharashtra")]
    fn test_destination_is_trimmed(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(DestinationQuery::new(input).validate().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn test_blank_destination_rejected(#[case] input: &str) {
        let err = DestinationQuery::new(input).validate().unwrap_err();
        assert!(err.is_validation());
    }
}
