//! Shared token-bucket rate limiter.
//!
//! One bucket guards every route: it holds at most `burst` tokens and refills
//! at `per_second` tokens per second. A request that finds the bucket empty
//! is answered with `429 rate limit exceeded` without reaching the routes.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, ResponseError};
use chrono::{DateTime, Utc};
use futures_util::future::{Ready, ready};
use mockable::Clock;
use tracing::debug;

use crate::domain::Error as DomainError;

/// Refill rate and capacity of the shared bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitConfig {
    pub per_second: f64,
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: 15.0,
            burst: 5,
        }
    }
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    refilled_at: DateTime<Utc>,
}

/// Token bucket driven by an injected clock. Starts full.
pub struct TokenBucket {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        let state = BucketState {
            tokens: f64::from(config.burst),
            refilled_at: clock.utc(),
        };
        Self {
            config,
            clock,
            state: Mutex::new(state),
        }
    }

    /// Take one token if available.
    pub fn try_acquire(&self) -> bool {
        let now = self.clock.utc();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let elapsed = (now - state.refilled_at)
            .to_std()
            .map_or(0.0, |elapsed| elapsed.as_secs_f64());
        let capacity = f64::from(self.config.burst);
        state.tokens = (state.tokens + elapsed * self.config.per_second).min(capacity);
        if now > state.refilled_at {
            state.refilled_at = now;
        }

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Middleware rejecting requests once the shared bucket is empty.
///
/// Clones share the same bucket, so one instance built outside the
/// `HttpServer` factory limits all workers together.
#[derive(Clone)]
pub struct RateLimit {
    bucket: Arc<TokenBucket>,
}

impl RateLimit {
    pub fn new(bucket: Arc<TokenBucket>) -> Self {
        Self { bucket }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            bucket: Arc::clone(&self.bucket),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: S,
    bucket: Arc<TokenBucket>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !self.bucket.try_acquire() {
            debug!(path = %req.path(), "request rejected by rate limiter");
            let response = DomainError::too_many_requests("rate limit exceeded").error_response();
            return Box::pin(ready(Ok(req.into_response(response).map_into_right_body())));
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
