//! Domain primitives, ports, and services.
//!
//! Purpose: define the symptom-tracking entities and the use-cases that
//! operate on them, independent of HTTP, SQL, or any identity provider.
//! Types validate on construction and document their serde contracts.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failures.
//! - User, Tracker, Symptom, SymptomLog: persisted entities.
//! - Credentials, AuthTokens, Claims: authentication values.
//! - TrackingService, AccountService, InsightsService: driving port
//!   implementations.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod ids;
pub mod insights;
pub mod insights_service;
pub mod ports;
pub mod symptom_log;
pub mod trace_id;
pub mod tracker;
pub mod tracking_service;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    AuthTokens, AuthValidationError, Claims, Confirmation, Credentials, IdTokenError,
    SignUpDetails, parse_username, subject_from_id_token,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::ids::{SymptomId, SymptomLogId, TrackerId, UserId};
pub use self::insights::{LogSummaryEntry, MedicalTradition, build_prompt, preprocess_notes};
pub use self::insights_service::InsightsService;
pub use self::symptom_log::{NOTES_MAX, SEVERITY_MAX, Severity, SymptomLog, SymptomLogDraft};
pub use self::trace_id::TraceId;
pub use self::tracker::{
    MAX_TRACKERS_PER_USER, NAME_MAX, Symptom, SymptomName, Tracker, TrackerDetails, TrackerName,
    TrackingValidationError,
};
pub use self::tracking_service::TrackingService;
pub use self::user::{EMAIL_MAX, Email, SUBJECT_MAX, Subject, User, UserValidationError};

/// Convenient result alias for handlers and services.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use symptom_tracker::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("tracker belongs to another user"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
