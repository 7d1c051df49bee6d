//! PostgreSQL-backed `TrackerRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TrackerRepository, TrackingPersistenceError};
use crate::domain::{Tracker, TrackerId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewTrackerRow, TrackerRow, collect_rows};
use super::pool::DbPool;
use super::schema::trackers;

/// Diesel-backed implementation of the tracker repository port.
#[derive(Clone)]
pub struct DieselTrackerRepository {
    pool: DbPool,
}

impl DieselTrackerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackerRepository for DieselTrackerRepository {
    /// The `trackers_per_user_limit` trigger locks the owner row and counts
    /// inside this statement, so the cap holds under concurrent inserts.
    async fn insert(&self, tracker: &Tracker) -> Result<(), TrackingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(trackers::table)
            .values(NewTrackerRow::from(tracker))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &TrackerId,
    ) -> Result<Option<Tracker>, TrackingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = trackers::table
            .filter(trackers::id.eq(id.as_uuid()))
            .select(TrackerRow::as_select())
            .first::<TrackerRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Tracker::try_from).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Tracker>, TrackingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TrackerRow> = trackers::table
            .filter(trackers::user_id.eq(user_id.as_uuid()))
            .order((trackers::created_at.asc(), trackers::id.asc()))
            .select(TrackerRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows)
    }
}
