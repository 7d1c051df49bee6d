//! Port for user persistence.
use async_trait::async_trait;

use crate::domain::{Subject, User};

use super::TrackingPersistenceError;

/// Storage for local user rows keyed by provider subject.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    ///
    /// A second row for the same subject fails with
    /// [`TrackingPersistenceError::Conflict`].
    async fn insert(&self, user: &User) -> Result<(), TrackingPersistenceError>;

    /// Fetch the user registered for `subject`.
    async fn find_by_subject(
        &self,
        subject: &Subject,
    ) -> Result<Option<User>, TrackingPersistenceError>;
}
