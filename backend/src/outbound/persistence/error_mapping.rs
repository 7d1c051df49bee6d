//! Mapping from pool and Diesel failures to [`TrackingPersistenceError`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::TrackingPersistenceError;

use super::pool::PoolError;

/// Constraint name raised by the tracker cap trigger.
const TRACKER_LIMIT_CONSTRAINT: &str = "trackers_per_user_limit";

pub(super) fn map_pool_error(error: PoolError) -> TrackingPersistenceError {
    TrackingPersistenceError::connection(error.into_message())
}

/// Unique violations become conflicts named after the violated constraint;
/// the tracker cap trigger becomes `LimitReached`.
pub(super) fn map_diesel_error(error: DieselError) -> TrackingPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(_, info)
            if info.constraint_name() == Some(TRACKER_LIMIT_CONSTRAINT) =>
        {
            TrackingPersistenceError::limit_reached(TRACKER_LIMIT_CONSTRAINT)
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            TrackingPersistenceError::conflict(
                info.constraint_name()
                    .unwrap_or("unique constraint")
                    .to_owned(),
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            TrackingPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            TrackingPersistenceError::query("referenced record does not exist")
        }
        DieselError::NotFound => TrackingPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => {
            TrackingPersistenceError::query("database query error")
        }
        _ => TrackingPersistenceError::query("database error"),
    }
}
