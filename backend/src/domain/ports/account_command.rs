//! Driving port for account lifecycle use-cases.
//!
//! Inbound adapters call this port instead of the identity provider so that
//! provider failures arrive already mapped to domain errors.

use async_trait::async_trait;

use crate::domain::{AuthTokens, Confirmation, Credentials, Error, SignUpDetails, Subject};

/// Successful password sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInOutcome {
    pub tokens: AuthTokens,
    /// Subject read from the returned ID token.
    pub subject: Subject,
    /// Refresh token moved out of `tokens`.
    pub refresh_token: String,
}

/// Domain use-case port for sign-up, confirmation, and token issuance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    async fn sign_up(&self, details: SignUpDetails) -> Result<(), Error>;

    async fn confirm_sign_up(&self, confirmation: Confirmation) -> Result<(), Error>;

    async fn resend_confirmation_code(&self, username: String) -> Result<(), Error>;

    /// Authenticate with a password.
    async fn sign_in(&self, credentials: Credentials) -> Result<SignInOutcome, Error>;

    /// Exchange the refresh token issued to `subject` for fresh tokens.
    async fn refresh(&self, subject: Subject, refresh_token: String) -> Result<AuthTokens, Error>;
}
