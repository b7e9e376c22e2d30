//! Civic complaint submission
//!
//! Nothing is sent anywhere. A valid draft is acknowledged after a fixed
//! delay with a generated id; an invalid one is rejected immediately.

use std::time::Duration;

use chrono::Utc;
use rand::RngExt;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::SafePathConfig;
use crate::models::{Complaint, ComplaintLocation, ComplaintStatus, ComplaintType};
use crate::{Result, SafePathError};

const MISSING_FIELDS: &str = "Please fill all required fields";

/// Complaint form contents before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplaintDraft {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub photo: Option<String>,
}

/// A draft that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidComplaint {
    pub kind: ComplaintType,
    pub description: String,
    pub location: ComplaintLocation,
    pub photo: Option<String>,
}

impl ComplaintDraft {
    /// Check required fields. Type, description and location must be present;
    /// the photo is optional.
    pub fn validate(&self) -> Result<ValidComplaint> {
        let kind = self.kind.trim();
        let description = self.description.trim();
        let location = self.location.trim();

        if kind.is_empty() || description.is_empty() || location.is_empty() {
            return Err(SafePathError::validation(MISSING_FIELDS));
        }

        Ok(ValidComplaint {
            kind: kind.parse()?,
            description: description.to_string(),
            location: ComplaintLocation::from_input(location),
            photo: self
                .photo
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ComplaintService {
    submit_delay: Duration,
}

impl ComplaintService {
    #[must_use]
    pub fn new(submit_delay: Duration) -> Self {
        Self { submit_delay }
    }

    #[must_use]
    pub fn from_config(config: &SafePathConfig) -> Self {
        Self::new(config.complaint.submit_delay())
    }

    /// Validate, wait out the submission delay, then acknowledge
    #[instrument(skip(self, draft), fields(kind = %draft.kind))]
    pub async fn submit(&self, draft: &ComplaintDraft) -> Result<Complaint> {
        let valid = draft.validate()?;

        tokio::time::sleep(self.submit_delay).await;

        let complaint = Complaint {
            id: complaint_id(),
            kind: valid.kind,
            description: valid.description,
            location: valid.location,
            photo: valid.photo,
            timestamp: Utc::now(),
            status: ComplaintStatus::Submitted,
        };
        info!("Complaint {} registered ({})", complaint.id, complaint.kind);
        Ok(complaint)
    }
}

fn complaint_id() -> String {
    let suffix: u32 = rand::rng().random_range(0..10_000);
    format!("CMP-{}-{:04}", Utc::now().timestamp_millis(), suffix)
}
