//! Tracking HTTP handlers.
//!
//! ```text
//! GET  /db/user
//! POST /db/make-user            {"email"?, "trackerName"?, "symptoms"?}
//! POST /db/make-tracker         {"trackerName", "symptoms"?}   (alias /db/make-illness)
//! POST /db/make-symptoms        {"trackerId", "symptoms"}
//! POST /db/create-symptom-log   {"trackerId", "logTime"?, "severity", "symptoms", "notes"?}
//! GET  /db/logs?trackerId=
//! ```
//!
//! Every route sits behind the bearer middleware; the caller's subject comes
//! from the verified claims and never from the body.

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::ports::{CreateUserRequest, NewTracker, UserProfile};
use crate::domain::{
    Email, Error, Severity, SymptomLog, SymptomLogDraft, SymptomName, TrackerId, TrackerName,
    TrackingValidationError, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::claims::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Body of `POST /db/make-user`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "tracker_name", alias = "illnessName", alias = "illness_name")]
    pub tracker_name: Option<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
}

/// Body of `POST /db/make-tracker`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeTrackerRequest {
    #[serde(default, alias = "tracker_name", alias = "illnessName", alias = "illness_name")]
    pub tracker_name: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
}

/// Body of `POST /db/make-symptoms`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeSymptomsRequest {
    #[serde(alias = "tracker_id")]
    pub tracker_id: TrackerId,
    #[serde(default)]
    pub symptoms: Vec<String>,
}

/// Symptom set of a log entry: free text, or a list joined with `", "`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LoggedSymptoms {
    Text(String),
    List(Vec<String>),
}

impl LoggedSymptoms {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::List(items) => items.join(", "),
        }
    }
}

/// Body of `POST /db/create-symptom-log`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSymptomLogRequest {
    #[serde(alias = "tracker_id")]
    pub tracker_id: TrackerId,
    #[serde(default, alias = "log_time")]
    pub log_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub severity: String,
    pub symptoms: LoggedSymptoms,
    #[serde(default)]
    pub notes: String,
}

/// Query of `GET /db/logs`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsQuery {
    #[serde(alias = "tracker_id")]
    pub tracker_id: TrackerId,
}

fn map_tracking_validation_error(err: TrackingValidationError) -> Error {
    Error::invalid_request(err.to_string())
}

fn map_user_validation_error(err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string())
}

fn parse_new_tracker(name: &str, symptoms: &[String]) -> Result<NewTracker, Error> {
    Ok(NewTracker {
        name: TrackerName::new(name).map_err(map_tracking_validation_error)?,
        symptoms: SymptomName::parse_all(symptoms).map_err(map_tracking_validation_error)?,
    })
}

fn parse_make_user(
    payload: MakeUserRequest,
    user: &AuthenticatedUser,
) -> Result<CreateUserRequest, Error> {
    let raw_email = payload
        .email
        .filter(|email| !email.trim().is_empty())
        .or_else(|| user.claims().email().map(str::to_owned))
        .ok_or_else(|| Error::invalid_request("email is required"))?;
    let email = Email::new(raw_email).map_err(map_user_validation_error)?;

    let first_tracker = match payload.tracker_name {
        Some(name) => Some(parse_new_tracker(&name, &payload.symptoms)?),
        None if payload.symptoms.is_empty() => None,
        None => {
            return Err(Error::invalid_request(
                "trackerName is required when symptoms are given",
            ));
        }
    };
    Ok(CreateUserRequest {
        email,
        first_tracker,
    })
}

fn parse_log_draft(payload: CreateSymptomLogRequest) -> Result<SymptomLogDraft, Error> {
    let severity = Severity::new(&payload.severity).map_err(map_tracking_validation_error)?;
    SymptomLogDraft::new(
        payload.tracker_id,
        payload.log_time,
        severity,
        payload.symptoms.into_text(),
        payload.notes,
    )
    .map_err(map_tracking_validation_error)
}

/// Profile of the caller: user row, trackers, and their symptoms.
#[get("/user")]
pub async fn get_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<UserProfile>> {
    let profile = state.tracking_query.profile(user.subject()).await?;
    Ok(web::Json(profile))
}

/// Create the caller's user row, optionally with a first tracker.
#[post("/make-user")]
pub async fn make_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<MakeUserRequest>,
) -> ApiResult<HttpResponse> {
    let request = parse_make_user(payload.into_inner(), &user)?;
    let profile = state.tracking.create_user(user.subject(), request).await?;
    Ok(HttpResponse::Created().json(profile))
}

/// Create a tracker owned by the caller.
///
/// Registered under `/make-tracker` and the legacy `/make-illness` path.
pub async fn make_tracker(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<MakeTrackerRequest>,
) -> ApiResult<HttpResponse> {
    let tracker = parse_new_tracker(&payload.tracker_name, &payload.symptoms)?;
    let details = state.tracking.create_tracker(user.subject(), tracker).await?;
    Ok(HttpResponse::Created().json(details))
}

/// Add symptoms to one of the caller's trackers.
#[post("/make-symptoms")]
pub async fn make_symptoms(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<MakeSymptomsRequest>,
) -> ApiResult<HttpResponse> {
    let MakeSymptomsRequest {
        tracker_id,
        symptoms,
    } = payload.into_inner();
    if symptoms.is_empty() {
        return Err(Error::invalid_request("symptoms must not be empty"));
    }
    let names = SymptomName::parse_all(&symptoms).map_err(map_tracking_validation_error)?;
    let created = state
        .tracking
        .add_symptoms(user.subject(), tracker_id, names)
        .await?;
    Ok(HttpResponse::Created().json(created))
}

/// Record a log entry against one of the caller's trackers.
#[post("/create-symptom-log")]
pub async fn create_symptom_log(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateSymptomLogRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_log_draft(payload.into_inner())?;
    let log = state.tracking.record_log(user.subject(), draft).await?;
    Ok(HttpResponse::Created().json(log))
}

/// Log entries of one of the caller's trackers, newest first.
#[get("/logs")]
pub async fn list_logs(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<LogsQuery>,
) -> ApiResult<web::Json<Vec<SymptomLog>>> {
    let logs = state
        .tracking_query
        .logs_for_tracker(user.subject(), query.tracker_id)
        .await?;
    Ok(web::Json(logs))
}

#[cfg(test)]
#[path = "tracking_tests.rs"]
mod tests;
