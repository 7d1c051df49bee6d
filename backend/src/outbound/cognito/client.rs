//! AWS SDK-backed `IdentityProvider` adapter.
//!
//! Owns the app client identity and the secret-hash calculation; every call
//! made here carries a `SECRET_HASH` bound to the username (or, for
//! refreshes, the subject).

use async_trait::async_trait;
use aws_sdk_cognitoidentityprovider::Client;
use aws_sdk_cognitoidentityprovider::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cognitoidentityprovider::types::{
    AttributeType, AuthFlowType, AuthenticationResultType,
};
use tracing::{debug, warn};

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{AuthTokens, Confirmation, Credentials, SignUpDetails, Subject};

use super::secret_hash::SecretHasher;

/// User pool coordinates for one app client.
#[derive(Debug, Clone)]
pub struct CognitoSettings {
    pub user_pool_id: String,
    pub hasher: SecretHasher,
}

/// Cognito user pool adapter.
#[derive(Clone)]
pub struct CognitoIdentityProvider {
    client: Client,
    user_pool_id: String,
    hasher: SecretHasher,
}

impl CognitoIdentityProvider {
    /// Wrap an SDK client built from the shared AWS configuration.
    pub fn new(client: Client, settings: CognitoSettings) -> Self {
        Self {
            client,
            user_pool_id: settings.user_pool_id,
            hasher: settings.hasher,
        }
    }

    fn secret_hash(&self, username: &str) -> Result<String, IdentityProviderError> {
        self.hasher
            .hash(username)
            .map_err(|err| IdentityProviderError::unavailable(format!("secret hash: {err}")))
    }

    fn attribute(name: &str, value: &str) -> Result<AttributeType, IdentityProviderError> {
        AttributeType::builder()
            .name(name)
            .value(value)
            .build()
            .map_err(|err| IdentityProviderError::invalid_request(err.to_string()))
    }
}

/// Classify a provider error by its service error code.
fn classify(code: Option<&str>, message: String) -> IdentityProviderError {
    match code {
        Some("NotAuthorizedException" | "CodeMismatchException" | "ExpiredCodeException") => {
            IdentityProviderError::not_authorized(message)
        }
        Some("UserNotConfirmedException") => IdentityProviderError::not_confirmed(),
        Some("UserNotFoundException") => IdentityProviderError::unknown_user(),
        Some("UsernameExistsException" | "AliasExistsException") => {
            IdentityProviderError::username_taken()
        }
        Some("TooManyRequestsException" | "LimitExceededException" | "TooManyFailedAttemptsException") => {
            IdentityProviderError::throttled()
        }
        Some(
            "InvalidParameterException"
            | "InvalidPasswordException"
            | "CodeDeliveryFailureException",
        ) => IdentityProviderError::invalid_request(message),
        _ => IdentityProviderError::unavailable(message),
    }
}

fn map_sdk_error<E, R>(operation: &'static str, error: SdkError<E, R>) -> IdentityProviderError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = error.code().map(str::to_owned);
    let message = error
        .message()
        .map_or_else(|| DisplayErrorContext(&error).to_string(), str::to_owned);
    debug!(operation, code = ?code, "identity provider call failed");
    classify(code.as_deref(), message)
}

fn into_tokens(
    result: Option<&AuthenticationResultType>,
) -> Result<AuthTokens, IdentityProviderError> {
    let Some(result) = result else {
        warn!("identity provider answered with a challenge instead of tokens");
        return Err(IdentityProviderError::missing_tokens());
    };
    let (Some(access_token), Some(id_token)) = (result.access_token(), result.id_token()) else {
        return Err(IdentityProviderError::missing_tokens());
    };
    Ok(AuthTokens {
        access_token: access_token.to_owned(),
        id_token: id_token.to_owned(),
        refresh_token: result.refresh_token().map(str::to_owned),
        expires_in: result.expires_in(),
        token_type: result.token_type().unwrap_or("Bearer").to_owned(),
    })
}

#[async_trait]
impl IdentityProvider for CognitoIdentityProvider {
    async fn sign_up(&self, details: &SignUpDetails) -> Result<(), IdentityProviderError> {
        let username = details.credentials.username();
        let mut attributes = vec![Self::attribute("email", username)?];
        if let Some(first) = details.first_name.as_deref() {
            attributes.push(Self::attribute("given_name", first)?);
        }
        if let Some(last) = details.last_name.as_deref() {
            attributes.push(Self::attribute("family_name", last)?);
        }

        self.client
            .sign_up()
            .client_id(self.hasher.client_id())
            .username(username)
            .password(details.credentials.password())
            .secret_hash(self.secret_hash(username)?)
            .set_user_attributes(Some(attributes))
            .send()
            .await
            .map(|_| ())
            .map_err(|err| map_sdk_error("sign_up", err))
    }

    async fn confirm_sign_up(
        &self,
        confirmation: &Confirmation,
    ) -> Result<(), IdentityProviderError> {
        self.client
            .confirm_sign_up()
            .client_id(self.hasher.client_id())
            .username(confirmation.username())
            .confirmation_code(confirmation.code())
            .secret_hash(self.secret_hash(confirmation.username())?)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| map_sdk_error("confirm_sign_up", err))
    }

    async fn resend_confirmation_code(&self, username: &str) -> Result<(), IdentityProviderError> {
        self.client
            .resend_confirmation_code()
            .client_id(self.hasher.client_id())
            .username(username)
            .secret_hash(self.secret_hash(username)?)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| map_sdk_error("resend_confirmation_code", err))
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthTokens, IdentityProviderError> {
        let output = self
            .client
            .admin_initiate_auth()
            .user_pool_id(&self.user_pool_id)
            .client_id(self.hasher.client_id())
            .auth_flow(AuthFlowType::AdminUserPasswordAuth)
            .auth_parameters("USERNAME", credentials.username())
            .auth_parameters("PASSWORD", credentials.password())
            .auth_parameters("SECRET_HASH", self.secret_hash(credentials.username())?)
            .send()
            .await
            .map_err(|err| map_sdk_error("admin_initiate_auth", err))?;
        into_tokens(output.authentication_result())
    }

    async fn refresh(
        &self,
        subject: &Subject,
        refresh_token: &str,
    ) -> Result<AuthTokens, IdentityProviderError> {
        let output = self
            .client
            .admin_initiate_auth()
            .user_pool_id(&self.user_pool_id)
            .client_id(self.hasher.client_id())
            .auth_flow(AuthFlowType::RefreshTokenAuth)
            .auth_parameters("REFRESH_TOKEN", refresh_token)
            .auth_parameters("SECRET_HASH", self.secret_hash(subject.as_str())?)
            .send()
            .await
            .map_err(|err| map_sdk_error("admin_initiate_auth", err))?;
        into_tokens(output.authentication_result())
    }
}
