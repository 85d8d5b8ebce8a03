//! Ingestion pipeline
//!
//! Validates a raw submission, attaches the derived `analysis`, and performs
//! exactly one store append. Validation happens before any store access, so a
//! rejected payload never mutates the store.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::Roster;
use crate::error::ValidationError;
use crate::store::SharedStore;
use crate::submission::{next_id, RawSubmission, Submission};
use crate::Result;

/// Slider bounds (inclusive)
pub const SLIDER_MIN: f64 = 0.0;
pub const SLIDER_MAX: f64 = 100.0;

/// Successful ingestion result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReceipt {
    pub id: String,
}

/// Validates and stores incoming submissions
#[derive(Clone)]
pub struct Ingestor {
    store: SharedStore,
    roster: Roster,
}

impl Ingestor {
    pub fn new(store: SharedStore, roster: Roster) -> Self {
        Self { store, roster }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Decode an arbitrary JSON body, then ingest it
    pub async fn ingest_json(&self, body: Value) -> Result<IngestReceipt> {
        let raw: RawSubmission = serde_json::from_value(body)
            .map_err(|e| ValidationError::Malformed(e.to_string()))?;
        self.ingest(raw).await
    }

    pub async fn ingest(&self, raw: RawSubmission) -> Result<IngestReceipt> {
        let mut submission = validate(raw, &self.roster).map_err(|e| {
            warn!(error = %e, "Rejected submission");
            e
        })?;

        // Ids are always server-assigned
        submission.id = next_id();
        submission.ensure_identity();
        submission.analysis = Some(submission.compute_analysis());

        let id = self.store.append(submission).await?;
        info!(id = %id, backend = self.store.backend_name(), "Stored submission");
        Ok(IngestReceipt { id })
    }
}

/// Turn a raw payload into a submission without `analysis`
///
/// `id` is left empty for the caller to assign. `timestamp` is carried
/// through when supplied and left empty otherwise.
pub fn validate(raw: RawSubmission, roster: &Roster) -> std::result::Result<Submission, ValidationError> {
    let name = required_text(raw.name, "name")?;
    let date = required_text(raw.date, "date")?;
    let narrative = required_text(raw.narrative, "narrative")?;
    let value_triad = raw.value_triad.ok_or(ValidationError::MissingField("valueTriad"))?;
    let identity_triad = raw
        .identity_triad
        .ok_or(ValidationError::MissingField("identityTriad"))?;
    // 0 is a legitimate slider position; only absence is missing
    let slider = raw
        .university_startup_slider
        .ok_or(ValidationError::MissingField("universityStartupSlider"))?;

    if !(SLIDER_MIN..=SLIDER_MAX).contains(&slider) || slider.fract() != 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "universityStartupSlider",
            value: slider.to_string(),
        });
    }

    if !roster.contains(&name) {
        return Err(ValidationError::UnknownContributor(name));
    }

    Ok(Submission {
        id: String::new(),
        name,
        date,
        narrative,
        value_triad,
        identity_triad,
        university_startup_slider: slider as u8,
        timestamp: raw.timestamp.unwrap_or_default(),
        analysis: None,
    })
}

fn required_text(value: Option<String>, field: &'static str) -> std::result::Result<String, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ValidationError::MissingField(field)),
    }
}
