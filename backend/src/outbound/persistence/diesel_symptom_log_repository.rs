//! PostgreSQL-backed `SymptomLogRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SymptomLogRepository, TrackingPersistenceError};
use crate::domain::{SymptomLog, TrackerId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewSymptomLogRow, SymptomLogRow, collect_rows};
use super::pool::DbPool;
use super::schema::symptom_logs;

/// Diesel-backed implementation of the symptom log repository port.
#[derive(Clone)]
pub struct DieselSymptomLogRepository {
    pool: DbPool,
}

impl DieselSymptomLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SymptomLogRepository for DieselSymptomLogRepository {
    async fn insert(&self, log: &SymptomLog) -> Result<(), TrackingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(symptom_logs::table)
            .values(NewSymptomLogRow::from(log))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_tracker(
        &self,
        tracker_id: &TrackerId,
    ) -> Result<Vec<SymptomLog>, TrackingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SymptomLogRow> = symptom_logs::table
            .filter(symptom_logs::tracker_id.eq(tracker_id.as_uuid()))
            .order((symptom_logs::log_time.desc(), symptom_logs::id.desc()))
            .select(SymptomLogRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows)
    }
}
