//! Timestamped symptom log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SymptomLogId, TrackerId, TrackingValidationError, UserId};

/// Upper bound on severity length, in characters.
pub const SEVERITY_MAX: usize = 32;
/// Upper bound on free-text notes, in characters.
pub const NOTES_MAX: usize = 4000;

/// Free-form severity label ("mild", "7/10", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Severity(String);

impl Severity {
    /// Trim and validate a severity label.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TrackingValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TrackingValidationError::EmptySeverity);
        }
        if trimmed.chars().count() > SEVERITY_MAX {
            return Err(TrackingValidationError::SeverityTooLong { max: SEVERITY_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Severity {
    type Error = TrackingValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Severity> for String {
    fn from(value: Severity) -> Self {
        value.0
    }
}

/// Persisted log entry.
///
/// `symptoms` is the denormalised symptom set exactly as the client sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomLog {
    pub id: SymptomLogId,
    pub user_id: UserId,
    pub tracker_id: TrackerId,
    pub log_time: DateTime<Utc>,
    pub severity: Severity,
    pub symptoms: String,
    pub notes: String,
}

/// Client-supplied fields of a new log entry.
///
/// The owning user is never part of this draft; the tracking service fills
/// it in from the authenticated subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomLogDraft {
    pub tracker_id: TrackerId,
    pub log_time: Option<DateTime<Utc>>,
    pub severity: Severity,
    pub symptoms: String,
    pub notes: String,
}

impl SymptomLogDraft {
    /// Validate the free-text parts of a draft.
    pub fn new(
        tracker_id: TrackerId,
        log_time: Option<DateTime<Utc>>,
        severity: Severity,
        symptoms: impl Into<String>,
        notes: impl Into<String>,
    ) -> Result<Self, TrackingValidationError> {
        let notes = notes.into();
        if notes.chars().count() > NOTES_MAX {
            return Err(TrackingValidationError::NotesTooLong { max: NOTES_MAX });
        }
        Ok(Self {
            tracker_id,
            log_time,
            severity,
            symptoms: symptoms.into(),
            notes,
        })
    }

    /// Stamp the draft with its owner, identifier, and effective time.
    pub fn into_log(self, user_id: UserId, now: DateTime<Utc>) -> SymptomLog {
        SymptomLog {
            id: SymptomLogId::random(),
            user_id,
            tracker_id: self.tracker_id,
            log_time: self.log_time.unwrap_or(now),
            severity: self.severity,
            symptoms: self.symptoms,
            notes: self.notes,
        }
    }
}
