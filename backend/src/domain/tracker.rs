//! Trackers and the symptoms grouped under them.
//!
//! A tracker is the user-defined category (an illness, a condition, a
//! habit) that symptoms and log entries hang off. Each user owns at most
//! [`MAX_TRACKERS_PER_USER`] trackers.

use serde::{Deserialize, Serialize};

use super::{SymptomId, TrackerId, UserId};

/// Maximum number of trackers a single user may own.
pub const MAX_TRACKERS_PER_USER: usize = 5;
/// Upper bound on tracker and symptom name length, in characters.
pub const NAME_MAX: usize = 64;

/// Validation errors for tracking values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackingValidationError {
    /// A name field was blank.
    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },
    /// A name field exceeded [`NAME_MAX`].
    #[error("{field} must be at most {max} characters")]
    NameTooLong { field: &'static str, max: usize },
    /// Severity was blank.
    #[error("severity must not be empty")]
    EmptySeverity,
    /// Severity exceeded its length bound.
    #[error("severity must be at most {max} characters")]
    SeverityTooLong { max: usize },
    /// Notes exceeded their length bound.
    #[error("notes must be at most {max} characters")]
    NotesTooLong { max: usize },
}

fn validated_name(raw: &str, field: &'static str) -> Result<String, TrackingValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TrackingValidationError::EmptyName { field });
    }
    if trimmed.chars().count() > NAME_MAX {
        return Err(TrackingValidationError::NameTooLong {
            field,
            max: NAME_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Name of a tracker, unique per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackerName(String);

impl TrackerName {
    /// Trim and validate a tracker name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TrackingValidationError> {
        validated_name(raw.as_ref(), "tracker name").map(Self)
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TrackerName {
    type Error = TrackingValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TrackerName> for String {
    fn from(value: TrackerName) -> Self {
        value.0
    }
}

/// Name of a symptom within a tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SymptomName(String);

impl SymptomName {
    /// Trim and validate a symptom name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TrackingValidationError> {
        validated_name(raw.as_ref(), "symptom name").map(Self)
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate a batch of raw names, failing on the first invalid one.
    pub fn parse_all<I, S>(raw: I) -> Result<Vec<Self>, TrackingValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter().map(Self::new).collect()
    }
}

impl TryFrom<String> for SymptomName {
    type Error = TrackingValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SymptomName> for String {
    fn from(value: SymptomName) -> Self {
        value.0
    }
}

/// User-owned tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tracker {
    pub id: TrackerId,
    pub user_id: UserId,
    pub name: TrackerName,
}

impl Tracker {
    /// Create a new tracker for `user_id` with a fresh identifier.
    pub fn create(user_id: UserId, name: TrackerName) -> Self {
        Self {
            id: TrackerId::random(),
            user_id,
            name,
        }
    }

    /// Whether `user_id` owns this tracker.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Symptom recorded under a tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Symptom {
    pub id: SymptomId,
    pub tracker_id: TrackerId,
    pub name: SymptomName,
}

impl Symptom {
    /// Create a new symptom under `tracker_id` with a fresh identifier.
    pub fn create(tracker_id: TrackerId, name: SymptomName) -> Self {
        Self {
            id: SymptomId::random(),
            tracker_id,
            name,
        }
    }
}

/// Tracker together with its symptoms, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerDetails {
    #[serde(flatten)]
    pub tracker: Tracker,
    pub symptoms: Vec<Symptom>,
}
