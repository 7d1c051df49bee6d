//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use serde_json::{Map, Value};

use crate::domain::Claims;
use crate::domain::ports::{
    MockAccountCommand, MockInsightsQuery, MockTrackingCommand, MockTrackingQuery,
};
use crate::inbound::http::state::HttpState;

/// Subject carried by [`test_claims`].
pub const TEST_SUBJECT: &str = "3f2b0c9e-1111-4a6b-9c51-2b7a1c0d9e10";

/// Mocks for every driving port; set expectations, then call
/// [`TestPorts::into_state`].
#[derive(Default)]
pub struct TestPorts {
    pub accounts: MockAccountCommand,
    pub tracking: MockTrackingCommand,
    pub tracking_query: MockTrackingQuery,
    pub insights: MockInsightsQuery,
}

impl TestPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(self.accounts),
            Arc::new(self.tracking),
            Arc::new(self.tracking_query),
            Arc::new(self.insights),
        ))
    }
}

/// Claims as the bearer middleware would attach them for an ID token.
pub fn test_claims() -> Claims {
    let mut raw = Map::new();
    raw.insert("sub".into(), Value::String(TEST_SUBJECT.into()));
    raw.insert("email".into(), Value::String("ada@example.com".into()));
    Claims::from_map(raw).expect("fixture claims carry a subject")
}

/// Claims without an email, as on an access token.
pub fn access_token_claims() -> Claims {
    let mut raw = Map::new();
    raw.insert("sub".into(), Value::String(TEST_SUBJECT.into()));
    raw.insert("username".into(), Value::String(TEST_SUBJECT.into()));
    Claims::from_map(raw).expect("fixture claims carry a subject")
}

/// Build an app whose requests already carry `claims`, standing in for
/// the bearer middleware.
macro_rules! authenticated_app {
    ($state:expr, $claims:expr, $($service:expr),+ $(,)?) => {{
        use actix_web::HttpMessage as _;
        use actix_web::dev::Service as _;

        let claims = $claims;
        actix_web::App::new()
            .app_data($state)
            .app_data(actix_web::web::JsonConfig::default()
                .error_handler(crate::inbound::http::error::json_error_handler))
            .app_data(actix_web::web::QueryConfig::default()
                .error_handler(crate::inbound::http::error::query_error_handler))
            .wrap_fn(move |req, srv| {
                req.extensions_mut().insert(claims.clone());
                srv.call(req)
            })
            $(.service($service))+
    }};
}

pub(crate) use authenticated_app;
