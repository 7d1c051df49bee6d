//! PostgreSQL-backed `SymptomRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SymptomRepository, TrackingPersistenceError};
use crate::domain::{Symptom, TrackerId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewSymptomRow, SymptomRow, collect_rows};
use super::pool::DbPool;
use super::schema::symptoms;

/// Diesel-backed implementation of the symptom repository port.
#[derive(Clone)]
pub struct DieselSymptomRepository {
    pool: DbPool,
}

impl DieselSymptomRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SymptomRepository for DieselSymptomRepository {
    async fn insert(&self, symptom: &Symptom) -> Result<(), TrackingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(symptoms::table)
            .values(NewSymptomRow::from(symptom))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_tracker(
        &self,
        tracker_id: &TrackerId,
    ) -> Result<Vec<Symptom>, TrackingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SymptomRow> = symptoms::table
            .filter(symptoms::tracker_id.eq(tracker_id.as_uuid()))
            .order((symptoms::created_at.asc(), symptoms::id.asc()))
            .select(SymptomRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows)
    }
}
