//! Driving port for tracking reads.
use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Error, Subject, SymptomLog, TrackerDetails, TrackerId, User};

/// A user with every tracker they own and each tracker's symptoms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user: User,
    pub trackers: Vec<TrackerDetails>,
}

/// Domain use-case port for tracking reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackingQuery: Send + Sync {
    /// Load the profile of `subject`'s user.
    async fn profile(&self, subject: &Subject) -> Result<UserProfile, Error>;

    /// Log entries of a tracker owned by `subject`'s user, newest first.
    async fn logs_for_tracker(
        &self,
        subject: &Subject,
        tracker_id: TrackerId,
    ) -> Result<Vec<SymptomLog>, Error>;
}
