//! Route table for the HTTP adapter.
//!
//! ```text
//! /aws-cognito/*  account operations, unauthenticated
//! /db/*           tracking and insights, bearer token required
//! /health/*       checks
//! ```

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::TokenVerifier;
use crate::inbound::http::auth::{
    confirm_sign_up, refresh_token, request_verification_code, sign_in, sign_up,
};
use crate::inbound::http::error::{json_error_handler, query_error_handler};
use crate::inbound::http::health::{live, ready};
use crate::inbound::http::insights::insights;
use crate::inbound::http::tracking::{
    create_symptom_log, get_user, list_logs, make_symptoms, make_tracker, make_user,
};
use crate::middleware::BearerAuth;

/// Register every route on an app or scope.
///
/// State (`HttpState`, `HealthState`) is attached by the caller.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
/// use actix_web::App;
/// use symptom_tracker::domain::ports::TokenVerifier;
/// use symptom_tracker::inbound::http::routes::configure;
///
/// fn app(verifier: Arc<dyn TokenVerifier>) {
///     let _ = App::new().configure(configure(verifier));
/// }
/// ```
pub fn configure(verifier: Arc<dyn TokenVerifier>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .service(
                web::scope("/aws-cognito")
                    .service(sign_up)
                    .service(confirm_sign_up)
                    .service(request_verification_code)
                    .service(sign_in)
                    .service(refresh_token),
            )
            .service(
                web::scope("/db")
                    .wrap(BearerAuth::new(verifier))
                    .service(get_user)
                    .service(make_user)
                    .service(
                        web::resource(["/make-tracker", "/make-illness"])
                            .route(web::post().to(make_tracker)),
                    )
                    .service(make_symptoms)
                    .service(create_symptom_log)
                    .service(list_logs)
                    .service(insights),
            )
            .service(ready)
            .service(live);
    }
}
