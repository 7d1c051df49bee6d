//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod claims;
pub mod error;
pub mod health;
pub mod insights;
pub mod routes;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tracking;

pub use crate::domain::ApiResult;
