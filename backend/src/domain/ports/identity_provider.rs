//! Driven port for the managed identity provider.
//!
//! Adapters own the secret-hash computation and the provider's wire
//! protocol; the domain only sees validated inputs and [`AuthTokens`].

use async_trait::async_trait;

use crate::domain::{AuthTokens, Confirmation, Credentials, SignUpDetails, Subject};

use super::define_port_error;

define_port_error! {
    /// Failures reported by identity provider adapters.
    pub enum IdentityProviderError {
        /// Provider rejected the request shape or a parameter.
        InvalidRequest { message: String } => "identity provider rejected request: {message}",
        /// Credentials, refresh token, or confirmation code were not accepted.
        NotAuthorized { message: String } => "identity provider denied access: {message}",
        /// Account exists but has not been confirmed yet.
        NotConfirmed => "account is not confirmed",
        /// No account matches the username.
        UnknownUser => "account does not exist",
        /// Username is already registered.
        UsernameTaken => "username is already registered",
        /// Provider throttled the caller.
        Throttled => "identity provider throttled the request",
        /// Provider answered without the expected authentication result.
        MissingTokens => "identity provider returned no tokens",
        /// Transport, credential-chain, or unclassified service failure.
        Unavailable { message: String } => "identity provider unavailable: {message}",
    }
}

/// Account lifecycle operations against the identity provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register an account whose email attribute equals its username.
    async fn sign_up(&self, details: &SignUpDetails) -> Result<(), IdentityProviderError>;

    /// Confirm an account with the emailed code.
    async fn confirm_sign_up(
        &self,
        confirmation: &Confirmation,
    ) -> Result<(), IdentityProviderError>;

    /// Send a fresh confirmation code.
    async fn resend_confirmation_code(&self, username: &str) -> Result<(), IdentityProviderError>;

    /// Password sign-in; the result includes a refresh token.
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthTokens, IdentityProviderError>;

    /// Exchange a refresh token for new access and ID tokens.
    async fn refresh(
        &self,
        subject: &Subject,
        refresh_token: &str,
    ) -> Result<AuthTokens, IdentityProviderError>;
}
