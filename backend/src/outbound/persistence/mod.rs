//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between Diesel rows and domain types and hold no
//! business rules. Row structs (`models.rs`) and table definitions
//! (`schema.rs`) never leave this module. Each method checks out one pooled
//! connection and runs one statement on it; there are no multi-statement
//! transactions.
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> Result<(), symptom_tracker::outbound::persistence::PoolError> {
//! use symptom_tracker::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/symptoms")).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_symptom_log_repository;
mod diesel_symptom_repository;
mod diesel_tracker_repository;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod pool;
mod rds_iam;
mod schema;

pub use diesel_symptom_log_repository::DieselSymptomLogRepository;
pub use diesel_symptom_repository::DieselSymptomRepository;
pub use diesel_tracker_repository::DieselTrackerRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
pub use rds_iam::RdsIamAuth;
