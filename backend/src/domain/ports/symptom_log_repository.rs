//! Port for symptom log persistence.
use async_trait::async_trait;

use crate::domain::{SymptomLog, TrackerId};

use super::TrackingPersistenceError;

/// Storage for timestamped log entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SymptomLogRepository: Send + Sync {
    /// Insert one log entry.
    async fn insert(&self, log: &SymptomLog) -> Result<(), TrackingPersistenceError>;

    /// Entries recorded under `tracker_id`, newest first.
    async fn list_for_tracker(
        &self,
        tracker_id: &TrackerId,
    ) -> Result<Vec<SymptomLog>, TrackingPersistenceError>;
}
