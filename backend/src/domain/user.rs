//! Local user record keyed by the identity provider subject.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::UserId;

/// Upper bound on subject length, in characters.
pub const SUBJECT_MAX: usize = 255;
/// Upper bound on email length, in characters.
pub const EMAIL_MAX: usize = 320;

/// Validation errors for user fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Subject was blank.
    #[error("subject must not be empty")]
    EmptySubject,
    /// Subject carried leading or trailing whitespace.
    #[error("subject must not contain surrounding whitespace")]
    SubjectWhitespace,
    /// Subject exceeded [`SUBJECT_MAX`].
    #[error("subject must be at most {max} characters")]
    SubjectTooLong { max: usize },
    /// Email was blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email lacked an `@`.
    #[error("email must contain '@'")]
    InvalidEmail,
    /// Email exceeded [`EMAIL_MAX`].
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
}

/// Identity provider subject (`sub` claim).
///
/// ## Invariants
/// - Non-empty with no surrounding whitespace.
/// - At most [`SUBJECT_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subject(String);

impl Subject {
    /// Validate and wrap a subject string.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(UserValidationError::EmptySubject);
        }
        if value.trim() != value {
            return Err(UserValidationError::SubjectWhitespace);
        }
        if value.chars().count() > SUBJECT_MAX {
            return Err(UserValidationError::SubjectTooLong { max: SUBJECT_MAX });
        }
        Ok(Self(value))
    }

    /// Borrow the subject text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Subject {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Subject {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Subject> for String {
    fn from(value: Subject) -> Self {
        value.0
    }
}

/// Contact email recorded for a user.
///
/// Only a light shape check is applied; the identity provider owns
/// verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Trim and validate an email address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !trimmed.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Application user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    #[serde(rename = "cognitoSub")]
    subject: Subject,
    email: Email,
}

impl User {
    /// Assemble a user from validated parts.
    pub fn new(id: UserId, subject: Subject, email: Email) -> Self {
        Self { id, subject, email }
    }

    /// Local identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Provider subject.
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Contact email.
    pub fn email(&self) -> &Email {
        &self.email
    }
}
