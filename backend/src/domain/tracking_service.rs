//! Tracking domain service.
//!
//! Implements [`TrackingCommand`] and [`TrackingQuery`] over the four
//! repository ports. Every operation first resolves the user row for the
//! authenticated subject; tracker-scoped operations then check that the
//! tracker exists and belongs to that user. The tracker cap is enforced by
//! the repository insert itself, so concurrent requests cannot overshoot it.
//! Inserts run one statement at a time, so a failure part-way through a
//! multi-row operation leaves the rows already written in place.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    CreateUserRequest, NewTracker, SymptomLogRepository, SymptomRepository, TrackerRepository,
    TrackingCommand, TrackingPersistenceError, TrackingQuery, UserProfile, UserRepository,
};
use crate::domain::{
    Error, MAX_TRACKERS_PER_USER, Subject, Symptom, SymptomLog, SymptomLogDraft, SymptomName,
    Tracker, TrackerDetails, TrackerId, User, UserId,
};

fn map_persistence_error(error: TrackingPersistenceError) -> Error {
    match error {
        TrackingPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("tracking store unavailable: {message}"))
        }
        TrackingPersistenceError::Query { message } => {
            Error::internal(format!("tracking store error: {message}"))
        }
        TrackingPersistenceError::Conflict { message } => {
            Error::conflict(format!("conflicting record: {message}"))
        }
        TrackingPersistenceError::LimitReached { message } => {
            debug!(%message, "tracker limit reached");
            Error::conflict(format!(
                "a user may own at most {MAX_TRACKERS_PER_USER} trackers"
            ))
        }
    }
}

/// Tracking service implementing the tracking driving ports.
pub struct TrackingService<U, T, S, L> {
    users: Arc<U>,
    trackers: Arc<T>,
    symptoms: Arc<S>,
    logs: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<U, T, S, L> Clone for TrackingService<U, T, S, L> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            trackers: Arc::clone(&self.trackers),
            symptoms: Arc::clone(&self.symptoms),
            logs: Arc::clone(&self.logs),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<U, T, S, L> TrackingService<U, T, S, L> {
    /// Create a service over the given repositories and clock.
    pub fn new(
        users: Arc<U>,
        trackers: Arc<T>,
        symptoms: Arc<S>,
        logs: Arc<L>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            trackers,
            symptoms,
            logs,
            clock,
        }
    }
}

impl<U, T, S, L> TrackingService<U, T, S, L>
where
    U: UserRepository,
    T: TrackerRepository,
    S: SymptomRepository,
    L: SymptomLogRepository,
{
    async fn require_user(&self, subject: &Subject) -> Result<User, Error> {
        self.users
            .find_by_subject(subject)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("no user is registered for this account"))
    }

    async fn owned_tracker(&self, user_id: UserId, tracker_id: TrackerId) -> Result<Tracker, Error> {
        let tracker = self
            .trackers
            .find_by_id(&tracker_id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("tracker {tracker_id} not found")))?;
        if !tracker.is_owned_by(user_id) {
            debug!(%tracker_id, %user_id, "tracker access denied for non-owner");
            return Err(Error::forbidden("tracker belongs to another user"));
        }
        Ok(tracker)
    }

    async fn insert_symptoms(
        &self,
        tracker_id: TrackerId,
        names: Vec<SymptomName>,
    ) -> Result<Vec<Symptom>, Error> {
        let mut created = Vec::with_capacity(names.len());
        for name in names {
            let symptom = Symptom::create(tracker_id, name);
            self.symptoms
                .insert(&symptom)
                .await
                .map_err(map_persistence_error)?;
            created.push(symptom);
        }
        Ok(created)
    }

    async fn insert_tracker(
        &self,
        user_id: UserId,
        new_tracker: NewTracker,
    ) -> Result<TrackerDetails, Error> {
        let tracker = Tracker::create(user_id, new_tracker.name);
        self.trackers
            .insert(&tracker)
            .await
            .map_err(map_persistence_error)?;
        let symptoms = self.insert_symptoms(tracker.id, new_tracker.symptoms).await?;
        Ok(TrackerDetails { tracker, symptoms })
    }

    async fn tracker_details(&self, user_id: UserId) -> Result<Vec<TrackerDetails>, Error> {
        let trackers = self
            .trackers
            .list_for_user(&user_id)
            .await
            .map_err(map_persistence_error)?;
        let mut details = Vec::with_capacity(trackers.len());
        for tracker in trackers {
            let symptoms = self
                .symptoms
                .list_for_tracker(&tracker.id)
                .await
                .map_err(map_persistence_error)?;
            details.push(TrackerDetails { tracker, symptoms });
        }
        Ok(details)
    }
}

#[async_trait]
impl<U, T, S, L> TrackingCommand for TrackingService<U, T, S, L>
where
    U: UserRepository,
    T: TrackerRepository,
    S: SymptomRepository,
    L: SymptomLogRepository,
{
    async fn create_user(
        &self,
        subject: &Subject,
        request: CreateUserRequest,
    ) -> Result<UserProfile, Error> {
        let existing = self
            .users
            .find_by_subject(subject)
            .await
            .map_err(map_persistence_error)?;
        if existing.is_some() {
            return Err(Error::conflict("a user already exists for this account"));
        }

        let user = User::new(UserId::random(), subject.clone(), request.email);
        self.users
            .insert(&user)
            .await
            .map_err(map_persistence_error)?;

        let trackers = match request.first_tracker {
            Some(first) => vec![self.insert_tracker(user.id(), first).await?],
            None => Vec::new(),
        };
        Ok(UserProfile { user, trackers })
    }

    async fn create_tracker(
        &self,
        subject: &Subject,
        tracker: NewTracker,
    ) -> Result<TrackerDetails, Error> {
        let user = self.require_user(subject).await?;
        self.insert_tracker(user.id(), tracker).await
    }

    async fn add_symptoms(
        &self,
        subject: &Subject,
        tracker_id: TrackerId,
        symptoms: Vec<SymptomName>,
    ) -> Result<Vec<Symptom>, Error> {
        let user = self.require_user(subject).await?;
        let tracker = self.owned_tracker(user.id(), tracker_id).await?;
        self.insert_symptoms(tracker.id, symptoms).await
    }

    async fn record_log(
        &self,
        subject: &Subject,
        draft: SymptomLogDraft,
    ) -> Result<SymptomLog, Error> {
        let user = self.require_user(subject).await?;
        self.owned_tracker(user.id(), draft.tracker_id).await?;
        let log = draft.into_log(user.id(), self.clock.utc());
        self.logs
            .insert(&log)
            .await
            .map_err(map_persistence_error)?;
        Ok(log)
    }
}

#[async_trait]
impl<U, T, S, L> TrackingQuery for TrackingService<U, T, S, L>
where
    U: UserRepository,
    T: TrackerRepository,
    S: SymptomRepository,
    L: SymptomLogRepository,
{
    async fn profile(&self, subject: &Subject) -> Result<UserProfile, Error> {
        let user = self.require_user(subject).await?;
        let trackers = self.tracker_details(user.id()).await?;
        Ok(UserProfile { user, trackers })
    }

    async fn logs_for_tracker(
        &self,
        subject: &Subject,
        tracker_id: TrackerId,
    ) -> Result<Vec<SymptomLog>, Error> {
        let user = self.require_user(subject).await?;
        let tracker = self.owned_tracker(user.id(), tracker_id).await?;
        self.logs
            .list_for_tracker(&tracker.id)
            .await
            .map_err(map_persistence_error)
    }
}

#[cfg(test)]
#[path = "tracking_service_tests.rs"]
mod tests;
