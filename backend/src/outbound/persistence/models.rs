//! Internal Diesel row structs.
//!
//! Rows convert into domain types through the validating constructors, so a
//! row that no longer satisfies a domain invariant surfaces as a query error
//! rather than an invalid value.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::TrackingPersistenceError;
use crate::domain::{
    Email, Severity, Subject, Symptom, SymptomId, SymptomLog, SymptomLogId, SymptomName, Tracker,
    TrackerId, TrackerName, User, UserId,
};

use super::schema::{symptom_logs, symptoms, trackers, users};

fn invalid_row(table: &str, err: impl std::fmt::Display) -> TrackingPersistenceError {
    TrackingPersistenceError::query(format!("invalid {table} row: {err}"))
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub cognito_sub: String,
    pub email: String,
}

impl TryFrom<UserRow> for User {
    type Error = TrackingPersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let subject = Subject::new(row.cognito_sub).map_err(|err| invalid_row("users", err))?;
        let email = Email::new(row.email).map_err(|err| invalid_row("users", err))?;
        Ok(User::new(UserId::from_uuid(row.id), subject, email))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub cognito_sub: &'a str,
    pub email: &'a str,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            cognito_sub: user.subject().as_str(),
            email: user.email().as_str(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trackers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TrackerRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
}

impl TryFrom<TrackerRow> for Tracker {
    type Error = TrackingPersistenceError;

    fn try_from(row: TrackerRow) -> Result<Self, Self::Error> {
        Ok(Tracker {
            id: TrackerId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            name: TrackerName::new(row.name).map_err(|err| invalid_row("trackers", err))?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trackers)]
pub(crate) struct NewTrackerRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
}

impl<'a> From<&'a Tracker> for NewTrackerRow<'a> {
    fn from(tracker: &'a Tracker) -> Self {
        Self {
            id: *tracker.id.as_uuid(),
            user_id: *tracker.user_id.as_uuid(),
            name: tracker.name.as_str(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = symptoms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SymptomRow {
    pub id: Uuid,
    pub tracker_id: Uuid,
    pub name: String,
}

impl TryFrom<SymptomRow> for Symptom {
    type Error = TrackingPersistenceError;

    fn try_from(row: SymptomRow) -> Result<Self, Self::Error> {
        Ok(Symptom {
            id: SymptomId::from_uuid(row.id),
            tracker_id: TrackerId::from_uuid(row.tracker_id),
            name: SymptomName::new(row.name).map_err(|err| invalid_row("symptoms", err))?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = symptoms)]
pub(crate) struct NewSymptomRow<'a> {
    pub id: Uuid,
    pub tracker_id: Uuid,
    pub name: &'a str,
}

impl<'a> From<&'a Symptom> for NewSymptomRow<'a> {
    fn from(symptom: &'a Symptom) -> Self {
        Self {
            id: *symptom.id.as_uuid(),
            tracker_id: *symptom.tracker_id.as_uuid(),
            name: symptom.name.as_str(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = symptom_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SymptomLogRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tracker_id: Uuid,
    pub log_time: DateTime<Utc>,
    pub severity: String,
    pub symptoms: String,
    pub notes: String,
}

impl TryFrom<SymptomLogRow> for SymptomLog {
    type Error = TrackingPersistenceError;

    fn try_from(row: SymptomLogRow) -> Result<Self, Self::Error> {
        Ok(SymptomLog {
            id: SymptomLogId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            tracker_id: TrackerId::from_uuid(row.tracker_id),
            log_time: row.log_time,
            severity: Severity::new(row.severity)
                .map_err(|err| invalid_row("symptom_logs", err))?,
            symptoms: row.symptoms,
            notes: row.notes,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = symptom_logs)]
pub(crate) struct NewSymptomLogRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tracker_id: Uuid,
    pub log_time: DateTime<Utc>,
    pub severity: &'a str,
    pub symptoms: &'a str,
    pub notes: &'a str,
}

impl<'a> From<&'a SymptomLog> for NewSymptomLogRow<'a> {
    fn from(log: &'a SymptomLog) -> Self {
        Self {
            id: *log.id.as_uuid(),
            user_id: *log.user_id.as_uuid(),
            tracker_id: *log.tracker_id.as_uuid(),
            log_time: log.log_time,
            severity: log.severity.as_str(),
            symptoms: &log.symptoms,
            notes: &log.notes,
        }
    }
}

/// Convert rows, failing on the first invalid one.
pub(crate) fn collect_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, TrackingPersistenceError>
where
    T: TryFrom<R, Error = TrackingPersistenceError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn user_rows_round_trip_through_domain_validation() {
        let row = UserRow {
            id: Uuid::new_v4(),
            cognito_sub: "sub-1".into(),
            email: "ada@example.com".into(),
        };
        let user = User::try_from(row.clone()).expect("valid row");
        let insert = NewUserRow::from(&user);
        assert_eq!(insert.id, row.id);
        assert_eq!(insert.cognito_sub, "sub-1");
    }

    #[rstest]
    fn blank_tracker_name_in_storage_is_a_query_error() {
        let row = TrackerRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "  ".into(),
        };
        let err = Tracker::try_from(row).expect_err("invalid row");
        assert!(matches!(err, TrackingPersistenceError::Query { .. }));
    }

    #[rstest]
    fn collect_rows_stops_on_invalid_entries() {
        let rows = vec![
            SymptomRow {
                id: Uuid::new_v4(),
                tracker_id: Uuid::new_v4(),
                name: "aura".into(),
            },
            SymptomRow {
                id: Uuid::new_v4(),
                tracker_id: Uuid::new_v4(),
                name: String::new(),
            },
        ];
        let result: Result<Vec<Symptom>, _> = collect_rows(rows);
        assert!(result.is_err());
    }
}
