//! Submission data model
//!
//! A submission is one captured pulse: narrative text, two triad positions,
//! and the university/startup slider, plus the server-derived `analysis`.
//! JSON field names are camelCase to stay compatible with records written by
//! earlier deployments.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

use crate::triad::{self, Point};

/// Contributors accepted when no roster is configured
pub const DEFAULT_ROSTER: [&str; 9] = [
    "Anna",
    "Andrej",
    "Justina",
    "Matt",
    "Anastasia",
    "Kirill",
    "Jordi",
    "Stacey",
    "Jane",
];

/// Vertex labels of the value triad (apex, left, right)
pub const VALUE_TRIAD_LABELS: [&str; 3] = ["The Container", "The Network", "The Launchpad"];

/// Vertex labels of the identity triad (apex, left, right)
pub const IDENTITY_TRIAD_LABELS: [&str; 3] = ["The Sanctuary", "The Laboratory", "The Guild"];

/// Slider end labels (0, 100)
pub const SLIDER_LABELS: [&str; 2] = ["University", "Startup"];

/// Persisted pulse record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Empty until assigned by [`Submission::ensure_identity`]
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub date: String,
    pub narrative: String,
    pub value_triad: Point,
    pub identity_triad: Point,
    pub university_startup_slider: u8,
    /// ISO-8601 instant; empty until assigned
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
}

impl Submission {
    /// Fill `id` and `timestamp` when absent; never touches other fields
    pub fn ensure_identity(&mut self) {
        if self.id.is_empty() {
            self.id = next_id();
        }
        if self.timestamp.is_empty() {
            self.timestamp = now_iso8601();
        }
    }

    /// Percentages derived from the raw triad coordinates
    pub fn compute_analysis(&self) -> Analysis {
        Analysis::derive(self.value_triad, self.identity_triad, self.university_startup_slider)
    }
}

/// Derived percentages attached at ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub values: ValueBreakdown,
    pub identity: IdentityBreakdown,
    pub academic_venture_balance: u8,
}

impl Analysis {
    pub fn derive(value_triad: Point, identity_triad: Point, slider: u8) -> Self {
        let [container, network, launchpad] = triad::standard_percentages(value_triad);
        let [sanctuary, laboratory, guild] = triad::standard_percentages(identity_triad);

        Self {
            values: ValueBreakdown {
                container,
                network,
                launchpad,
            },
            identity: IdentityBreakdown {
                sanctuary,
                laboratory,
                guild,
            },
            academic_venture_balance: slider,
        }
    }
}

/// Value triad percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueBreakdown {
    pub container: u32,
    pub network: u32,
    pub launchpad: u32,
}

/// Identity triad percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityBreakdown {
    pub sanctuary: u32,
    pub laboratory: u32,
    pub guild: u32,
}

/// Submission as received from a client, before validation
///
/// Every field is optional so that absence can be reported per field.
/// `id` and `analysis` are not listed: both are server-assigned and any
/// caller-supplied value is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubmission {
    pub name: Option<String>,
    pub date: Option<String>,
    pub narrative: Option<String>,
    pub value_triad: Option<Point>,
    pub identity_triad: Option<Point>,
    pub university_startup_slider: Option<f64>,
    pub timestamp: Option<String>,
}

/// Current instant in the `toISOString` shape (millisecond precision, `Z`)
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Next submission id: epoch milliseconds, bumped past the previous id so
/// two submissions in the same millisecond still get distinct, ordered ids
pub fn next_id() -> String {
    let now = Utc::now().timestamp_millis();
    let mut prev = LAST_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(prev + 1);
        match LAST_ID.compare_exchange_weak(prev, candidate, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return candidate.to_string(),
            Err(actual) => prev = actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Submission {
        Submission {
            id: String::new(),
            name: "Anna".to_string(),
            date: "2024-11-04T09:30".to_string(),
            narrative: "Pitched to the lab".to_string(),
            value_triad: Point::new(250.0, 250.0),
            identity_triad: Point::new(250.0, 100.0),
            university_startup_slider: 70,
            timestamp: String::new(),
            analysis: None,
        }
    }

    #[test]
    fn test_ids_strictly_increase() {
        let ids: Vec<i64> = (0..50).map(|_| next_id().parse().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ensure_identity_fills_only_missing() {
        let mut s = sample();
        s.ensure_identity();
        assert!(!s.id.is_empty());
        assert!(s.timestamp.ends_with('Z'));

        let mut preset = sample();
        preset.id = "42".to_string();
        preset.timestamp = "2024-01-01T00:00:00.000Z".to_string();
        preset.ensure_identity();
        assert_eq!(preset.id, "42");
        assert_eq!(preset.timestamp, "2024-01-01T00:00:00.000Z");
        assert_eq!(preset.narrative, "Pitched to the lab");
    }

    #[test]
    fn test_analysis_derivation() {
        let analysis = sample().compute_analysis();
        assert_eq!(
            analysis.values,
            ValueBreakdown {
                container: 33,
                network: 33,
                launchpad: 33
            }
        );
        assert_eq!(
            analysis.identity,
            IdentityBreakdown {
                sanctuary: 100,
                laboratory: 0,
                guild: 0
            }
        );
        assert_eq!(analysis.academic_venture_balance, 70);
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut s = sample();
        s.analysis = Some(s.compute_analysis());
        let value = serde_json::to_value(&s).unwrap();

        assert!(value.get("valueTriad").is_some());
        assert!(value.get("identityTriad").is_some());
        assert_eq!(value["universityStartupSlider"], 70);
        assert_eq!(value["analysis"]["academicVentureBalance"], 70);
        assert_eq!(value["analysis"]["values"]["container"], 33);
    }

    #[test]
    fn test_record_without_analysis_deserializes() {
        let value = json!({
            "id": "1730000000000",
            "name": "Matt",
            "date": "2024-10-27T10:00",
            "narrative": "n",
            "valueTriad": {"x": 250, "y": 250},
            "identityTriad": {"x": 250, "y": 250},
            "universityStartupSlider": 0,
            "timestamp": "2024-10-27T10:00:00.000Z"
        });
        let s: Submission = serde_json::from_value(value).unwrap();
        assert_eq!(s.university_startup_slider, 0);
        assert!(s.analysis.is_none());
    }
}
