//! Error types and handling for the `SafePath` application

use thiserror::Error;

/// Main error type for the `SafePath` application
#[derive(Error, Debug)]
pub enum SafePathError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl SafePathError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SafePathError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            SafePathError::Validation { message } => message.clone(),
        }
    }

    /// Whether the error was caused by the caller's input
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, SafePathError::Validation { .. })
    }
}
