//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, InsightsQuery, TrackingCommand, TrackingQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub tracking: Arc<dyn TrackingCommand>,
    pub tracking_query: Arc<dyn TrackingQuery>,
    pub insights: Arc<dyn InsightsQuery>,
}

impl HttpState {
    pub fn new(
        accounts: Arc<dyn AccountCommand>,
        tracking: Arc<dyn TrackingCommand>,
        tracking_query: Arc<dyn TrackingQuery>,
        insights: Arc<dyn InsightsQuery>,
    ) -> Self {
        Self {
            accounts,
            tracking,
            tracking_query,
            insights,
        }
    }
}
