//! Port for symptom persistence.
use async_trait::async_trait;

use crate::domain::{Symptom, TrackerId};

use super::TrackingPersistenceError;

/// Storage for symptoms grouped under trackers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SymptomRepository: Send + Sync {
    /// Insert one symptom.
    async fn insert(&self, symptom: &Symptom) -> Result<(), TrackingPersistenceError>;

    /// Symptoms recorded under `tracker_id`, oldest first.
    async fn list_for_tracker(
        &self,
        tracker_id: &TrackerId,
    ) -> Result<Vec<Symptom>, TrackingPersistenceError>;
}
