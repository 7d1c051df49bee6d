//! Driving port for tracking mutations.
//!
//! Every operation is scoped to the authenticated subject; the owning user
//! row is resolved by the implementation, never taken from the caller.

use async_trait::async_trait;

use crate::domain::{
    Email, Error, Subject, Symptom, SymptomLog, SymptomLogDraft, SymptomName, TrackerDetails,
    TrackerId, TrackerName,
};

use super::UserProfile;

/// Tracker and symptoms to create alongside a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTracker {
    pub name: TrackerName,
    pub symptoms: Vec<SymptomName>,
}

/// Registration of the local user row for a verified subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub email: Email,
    pub first_tracker: Option<NewTracker>,
}

/// Domain use-case port for tracking writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackingCommand: Send + Sync {
    /// Create the user row for `subject`, plus an optional first tracker.
    async fn create_user(
        &self,
        subject: &Subject,
        request: CreateUserRequest,
    ) -> Result<UserProfile, Error>;

    /// Create a tracker owned by `subject`'s user.
    async fn create_tracker(
        &self,
        subject: &Subject,
        tracker: NewTracker,
    ) -> Result<TrackerDetails, Error>;

    /// Add symptoms to a tracker owned by `subject`'s user.
    async fn add_symptoms(
        &self,
        subject: &Subject,
        tracker_id: TrackerId,
        symptoms: Vec<SymptomName>,
    ) -> Result<Vec<Symptom>, Error>;

    /// Record a log entry against a tracker owned by `subject`'s user.
    async fn record_log(
        &self,
        subject: &Subject,
        draft: SymptomLogDraft,
    ) -> Result<SymptomLog, Error>;
}
