//! Error shared by every tracking repository port.
//!
//! Users, trackers, symptoms, and logs live in one relational store, so the
//! adapters report failures through a single enum.

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by tracking repository adapters.
    pub enum TrackingPersistenceError {
        /// A pooled connection could not be checked out.
        Connection { message: String } => "tracking store connection failed: {message}",
        /// Statement failed during execution.
        Query { message: String } => "tracking store query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Conflict { message: String } => "tracking store conflict: {message}",
        /// A per-owner row limit rejected the write.
        LimitReached { message: String } => "tracking store limit reached: {message}",
    }
}
