//! Builders wiring outbound adapters into the driving ports held by
//! [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use symptom_tracker::domain::ports::{AccountCommand, InsightsQuery, TrackingCommand, TrackingQuery};
use symptom_tracker::domain::{AccountService, InsightsService, TrackingService};
use symptom_tracker::inbound::http::state::HttpState;
use symptom_tracker::outbound::persistence::{
    DbPool, DieselSymptomLogRepository, DieselSymptomRepository, DieselTrackerRepository,
    DieselUserRepository,
};

use super::ServerConfig;

fn build_tracking_pair(pool: &DbPool) -> (Arc<dyn TrackingCommand>, Arc<dyn TrackingQuery>) {
    let service = Arc::new(TrackingService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselTrackerRepository::new(pool.clone())),
        Arc::new(DieselSymptomRepository::new(pool.clone())),
        Arc::new(DieselSymptomLogRepository::new(pool.clone())),
        Arc::new(DefaultClock),
    ));
    (
        service.clone() as Arc<dyn TrackingCommand>,
        service as Arc<dyn TrackingQuery>,
    )
}

/// Assemble the handler state from the configured adapters.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let accounts: Arc<dyn AccountCommand> =
        Arc::new(AccountService::new(Arc::new(config.identity.clone())));
    let (tracking, tracking_query) = build_tracking_pair(&config.db_pool);
    let insights: Arc<dyn InsightsQuery> =
        Arc::new(InsightsService::new(Arc::clone(&config.summariser)));
    web::Data::new(HttpState::new(accounts, tracking, tracking_query, insights))
}
