//! Account lifecycle service.
//!
//! Wraps an [`IdentityProvider`] and maps its failures onto domain error
//! codes. Sign-in additionally reads the subject out of the returned ID
//! token so the inbound adapter can pin it in a cookie for later refreshes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{AccountCommand, IdentityProvider, IdentityProviderError, SignInOutcome};
use crate::domain::{
    AuthTokens, Confirmation, Credentials, Error, SignUpDetails, Subject, subject_from_id_token,
};

fn map_provider_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::InvalidRequest { message } => Error::invalid_request(message),
        IdentityProviderError::NotAuthorized { .. } => {
            Error::unauthorized("incorrect username, password, or token")
        }
        IdentityProviderError::NotConfirmed => Error::forbidden("account is not confirmed"),
        IdentityProviderError::UnknownUser => Error::not_found("account does not exist"),
        IdentityProviderError::UsernameTaken => Error::conflict("username is already registered"),
        IdentityProviderError::Throttled => {
            Error::too_many_requests("identity provider throttled the request")
        }
        IdentityProviderError::MissingTokens => {
            Error::internal("identity provider returned no tokens")
        }
        IdentityProviderError::Unavailable { message } => {
            Error::internal(format!("identity provider unavailable: {message}"))
        }
    }
}

/// Account service implementing [`AccountCommand`].
pub struct AccountService<P> {
    provider: Arc<P>,
}

impl<P> AccountService<P> {
    /// Create a service over the given identity provider.
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P> AccountCommand for AccountService<P>
where
    P: IdentityProvider,
{
    async fn sign_up(&self, details: SignUpDetails) -> Result<(), Error> {
        self.provider
            .sign_up(&details)
            .await
            .map_err(map_provider_error)
    }

    async fn confirm_sign_up(&self, confirmation: Confirmation) -> Result<(), Error> {
        self.provider
            .confirm_sign_up(&confirmation)
            .await
            .map_err(map_provider_error)
    }

    async fn resend_confirmation_code(&self, username: String) -> Result<(), Error> {
        self.provider
            .resend_confirmation_code(&username)
            .await
            .map_err(map_provider_error)
    }

    async fn sign_in(&self, credentials: Credentials) -> Result<SignInOutcome, Error> {
        let mut tokens = self
            .provider
            .sign_in(&credentials)
            .await
            .map_err(map_provider_error)?;
        let subject = subject_from_id_token(&tokens.id_token).map_err(|err| {
            warn!(error = %err, "identity provider issued an unreadable ID token");
            Error::internal(format!("failed to read ID token: {err}"))
        })?;
        let refresh_token = tokens
            .refresh_token
            .take()
            .ok_or_else(|| Error::internal("identity provider returned no refresh token"))?;
        Ok(SignInOutcome {
            tokens,
            subject,
            refresh_token,
        })
    }

    async fn refresh(&self, subject: Subject, refresh_token: String) -> Result<AuthTokens, Error> {
        self.provider
            .refresh(&subject, &refresh_token)
            .await
            .map_err(map_provider_error)
    }
}
