//! Port for tracker persistence.
use async_trait::async_trait;

use crate::domain::{Tracker, TrackerId, UserId};

use super::TrackingPersistenceError;

/// Storage for trackers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackerRepository: Send + Sync {
    /// Insert a new tracker.
    ///
    /// Duplicate names for one user are a `Conflict`. The owner's tracker
    /// count is checked by the same write: inserting beyond
    /// [`MAX_TRACKERS_PER_USER`](crate::domain::MAX_TRACKERS_PER_USER)
    /// fails with `LimitReached`, even when requests race.
    async fn insert(&self, tracker: &Tracker) -> Result<(), TrackingPersistenceError>;

    /// Fetch a tracker regardless of owner; callers check ownership.
    async fn find_by_id(&self, id: &TrackerId)
    -> Result<Option<Tracker>, TrackingPersistenceError>;

    /// All trackers owned by `user_id`, oldest first.
    async fn list_for_user(&self, user_id: &UserId)
    -> Result<Vec<Tracker>, TrackingPersistenceError>;
}
