//! Authentication values exchanged with the identity provider.
//!
//! Inbound payloads are validated into these types before any provider call
//! is made, and provider responses are reduced to [`AuthTokens`].

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Map, Value};
use zeroize::Zeroizing;

use super::{Subject, UserValidationError};

/// Validation failures for authentication payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Confirmation code was blank.
    #[error("confirmation code must not be empty")]
    EmptyConfirmationCode,
}

fn normalised_username(raw: &str) -> Result<String, AuthValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AuthValidationError::EmptyUsername);
    }
    Ok(trimmed.to_owned())
}

/// Username/password pair.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and kept verbatim; it is zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Validate raw inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, AuthValidationError> {
        let username = normalised_username(username)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Login name (the user's email for this application).
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Caller-provided password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration details for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpDetails {
    pub credentials: Credentials,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl SignUpDetails {
    /// Combine credentials with optional name attributes; blank names are dropped.
    pub fn new(
        credentials: Credentials,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Self {
        let keep = |value: Option<String>| {
            value
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        Self {
            credentials,
            first_name: keep(first_name),
            last_name: keep(last_name),
        }
    }
}

/// Account confirmation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    username: String,
    code: String,
}

impl Confirmation {
    /// Validate a username and emailed confirmation code.
    pub fn try_from_parts(username: &str, code: &str) -> Result<Self, AuthValidationError> {
        let username = normalised_username(username)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(AuthValidationError::EmptyConfirmationCode);
        }
        Ok(Self {
            username,
            code: code.to_owned(),
        })
    }

    /// Account being confirmed.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Code delivered by the provider.
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// Validate a bare username (used by the resend-code flow).
pub fn parse_username(raw: &str) -> Result<String, AuthValidationError> {
    normalised_username(raw)
}

/// Tokens returned by a successful sign-in or refresh.
///
/// `refresh_token` is only present after a password sign-in.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthTokens {
    pub access_token: String,
    pub id_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i32,
    pub token_type: String,
}

impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

/// Failures while reading claims out of an unverified ID token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdTokenError {
    /// Token did not have three dot-separated segments.
    #[error("ID token must have three segments")]
    Malformed,
    /// Payload segment was not base64url.
    #[error("ID token payload is not base64url: {message}")]
    Encoding { message: String },
    /// Payload was not a JSON object.
    #[error("ID token payload is not a JSON object: {message}")]
    Json { message: String },
    /// `sub` claim missing or not a string.
    #[error("ID token has no usable 'sub' claim")]
    MissingSubject,
    /// `sub` claim failed validation.
    #[error("ID token subject is invalid: {0}")]
    InvalidSubject(#[from] UserValidationError),
}

/// Read the `sub` claim from a provider-issued ID token.
///
/// The token was just returned by the provider over TLS, so the payload is
/// decoded without signature verification.
///
/// # Examples
/// ```
/// use symptom_tracker::domain::subject_from_id_token;
///
/// // {"sub":"abc-123"}
/// let token = "e30.eyJzdWIiOiJhYmMtMTIzIn0.c2ln";
/// assert_eq!(subject_from_id_token(token).unwrap().as_str(), "abc-123");
/// ```
pub fn subject_from_id_token(id_token: &str) -> Result<Subject, IdTokenError> {
    let segments: Vec<&str> = id_token.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(IdTokenError::Malformed);
    };
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| IdTokenError::Encoding {
            message: err.to_string(),
        })?;
    let claims: Map<String, Value> =
        serde_json::from_slice(&bytes).map_err(|err| IdTokenError::Json {
            message: err.to_string(),
        })?;
    let sub = claims
        .get("sub")
        .and_then(Value::as_str)
        .ok_or(IdTokenError::MissingSubject)?;
    Ok(Subject::new(sub)?)
}

/// Claims of a verified bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    subject: Subject,
    email: Option<String>,
    username: Option<String>,
    raw: Map<String, Value>,
}

impl Claims {
    /// Build claims from a decoded claim map.
    ///
    /// Returns `None` when the map lacks a valid `sub`.
    pub fn from_map(raw: Map<String, Value>) -> Option<Self> {
        let subject = raw
            .get("sub")
            .and_then(Value::as_str)
            .and_then(|sub| Subject::new(sub).ok())?;
        let text = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_owned);
        let email = text("email");
        let username = text("username").or_else(|| text("cognito:username"));
        Some(Self {
            subject,
            email,
            username,
            raw,
        })
    }

    /// Verified subject.
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// `email` claim (present on ID tokens).
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// `username` claim (present on access tokens).
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Any other claim by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }
}
