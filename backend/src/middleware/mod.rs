//! Request middleware.
//!
//! Purpose: cross-cutting request lifecycle concerns. Wrap order from the
//! outside in is [`Cors`], [`Trace`], [`RateLimit`], then [`BearerAuth`] on
//! the protected scope.

pub mod bearer_auth;
pub mod cors;
pub mod rate_limit;
pub mod trace;

pub use bearer_auth::BearerAuth;
pub use cors::Cors;
pub use rate_limit::{RateLimit, RateLimitConfig, TokenBucket};
pub use trace::Trace;
