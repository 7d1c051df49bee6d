//! Wall-clock test of the shared rate limiter in front of the full app.

mod support;

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use mockable::DefaultClock;

use symptom_tracker::middleware::{RateLimitConfig, TokenBucket};
use support::{Harness, init_app};

#[actix_web::test]
async fn rapid_requests_beyond_the_rate_are_throttled() {
    let harness = Harness::new();
    let bucket = Arc::new(TokenBucket::new(
        RateLimitConfig {
            per_second: 5.0,
            burst: 2,
        },
        Arc::new(DefaultClock),
    ));
    let app = init_app!(harness, bucket);

    let mut statuses = Vec::with_capacity(20);
    for _ in 0..20 {
        let res =
            test::call_service(&app, TestRequest::get().uri("/health/live").to_request()).await;
        statuses.push(res.status());
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    assert_eq!(statuses[0], StatusCode::OK);
    let throttled = statuses
        .iter()
        .filter(|status| **status == StatusCode::TOO_MANY_REQUESTS)
        .count();
    assert!(throttled > 0, "expected some 429s, got {statuses:?}");
    assert!(throttled < statuses.len(), "expected some requests through");
}

#[actix_web::test]
async fn throttled_responses_carry_trace_and_cors_headers() {
    let harness = Harness::new();
    let bucket = Arc::new(TokenBucket::new(
        RateLimitConfig {
            per_second: 0.001,
            burst: 1,
        },
        Arc::new(DefaultClock),
    ));
    let app = init_app!(harness, bucket);

    let first = test::call_service(&app, TestRequest::get().uri("/health/live").to_request()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let res = test::call_service(&app, TestRequest::get().uri("/health/live").to_request()).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(res.headers().contains_key("trace-id"));
    assert!(res.headers().contains_key("access-control-allow-origin"));
    assert_eq!(test::read_body(res).await, "rate limit exceeded");
}
