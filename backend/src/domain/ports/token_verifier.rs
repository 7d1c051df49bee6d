//! Driven port for bearer token verification.
use async_trait::async_trait;

use crate::domain::Claims;

use super::define_port_error;

define_port_error! {
    /// Reasons a bearer token was not accepted.
    pub enum TokenVerificationError {
        /// Signing keys could not be fetched or parsed.
        KeyFetch { message: String } => "signing keys unavailable: {message}",
        /// Token failed to decode, matched no key, or failed validation.
        Invalid { message: String } => "token rejected: {message}",
        /// Token verified but carries no usable subject.
        MissingSubject => "token has no subject claim",
    }
}

/// Verifies a compact JWT and returns its claims.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify `token` (without the `Bearer ` prefix).
    async fn verify(&self, token: &str) -> Result<Claims, TokenVerificationError>;
}
