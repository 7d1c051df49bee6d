//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;

use symptom_tracker::domain::ports::TokenVerifier;
use symptom_tracker::inbound::http::health::HealthState;
use symptom_tracker::inbound::http::routes::configure;
use symptom_tracker::inbound::http::state::HttpState;
use symptom_tracker::middleware::{Cors, RateLimit, TokenBucket, Trace};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    verifier: Arc<dyn TokenVerifier>,
    bucket: Arc<TokenBucket>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        verifier,
        bucket,
    } = deps;

    // Last wrap runs first: CORS answers preflights before rate limiting.
    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .configure(configure(verifier))
        .wrap(RateLimit::new(bucket))
        .wrap(Trace)
        .wrap(Cors)
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// Every worker shares one token bucket, so the rate limit applies to the
/// process as a whole.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let bucket = Arc::new(TokenBucket::new(config.rate_limit, Arc::new(DefaultClock)));
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        verifier: Arc::clone(&config.verifier),
        bucket,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
