//! Account HTTP handlers backed by the identity provider.
//!
//! ```text
//! POST /aws-cognito/signup                     {"username","password","firstName","lastName"}
//! POST /aws-cognito/confirm-signup             {"username","confirmationCode"}
//! POST /aws-cognito/request-verification-code  {"username"}
//! POST /aws-cognito/sign-in                    {"username","password"}
//! POST /aws-cognito/refresh-token              cookies: refreshToken, userSub
//! ```
//!
//! Sign-in stores the refresh token and the caller's subject in `HttpOnly`
//! cookies scoped to the refresh route; the refresh handler reads them back.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    AuthTokens, AuthValidationError, Confirmation, Credentials, Error, SignUpDetails, Subject,
    parse_username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Path the token cookies are scoped to.
pub const REFRESH_COOKIE_PATH: &str = "/aws-cognito/refresh-token";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";
pub const USER_SUB_COOKIE: &str = "userSub";

/// Body of `POST /aws-cognito/signup`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "first_name")]
    pub first_name: Option<String>,
    #[serde(default, alias = "last_name")]
    pub last_name: Option<String>,
}

/// Body of `POST /aws-cognito/sign-in`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /aws-cognito/confirm-signup` and
/// `POST /aws-cognito/request-verification-code`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default, alias = "confirmation_code")]
    pub confirmation_code: String,
}

/// Tokens returned to the browser. The refresh token only travels in a
/// cookie.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i32,
    pub token_type: String,
    pub id_token: String,
}

impl From<AuthTokens> for TokenResponse {
    fn from(value: AuthTokens) -> Self {
        Self {
            access_token: value.access_token,
            expires_in: value.expires_in,
            token_type: value.token_type,
            id_token: value.id_token,
        }
    }
}

fn map_auth_validation_error(err: AuthValidationError) -> Error {
    Error::invalid_request(err.to_string())
}

fn token_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build(name, value)
        .path(REFRESH_COOKIE_PATH)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .finish()
}

/// Register an account; the email attribute equals the username.
#[post("/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    let SignUpRequest {
        username,
        password,
        first_name,
        last_name,
    } = payload.into_inner();
    let credentials =
        Credentials::try_from_parts(&username, &password).map_err(map_auth_validation_error)?;
    let details = SignUpDetails::new(credentials, first_name, last_name);
    state.accounts.sign_up(details).await?;
    Ok(HttpResponse::Created().finish())
}

/// Confirm an account with the emailed code.
#[post("/confirm-signup")]
pub async fn confirm_sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<ConfirmationRequest>,
) -> ApiResult<HttpResponse> {
    let confirmation =
        Confirmation::try_from_parts(&payload.username, &payload.confirmation_code)
            .map_err(map_auth_validation_error)?;
    state.accounts.confirm_sign_up(confirmation).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Resend the confirmation code.
#[post("/request-verification-code")]
pub async fn request_verification_code(
    state: web::Data<HttpState>,
    payload: web::Json<ConfirmationRequest>,
) -> ApiResult<HttpResponse> {
    let username = parse_username(&payload.username).map_err(map_auth_validation_error)?;
    state.accounts.resend_confirmation_code(username).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Password sign-in; sets the refresh cookies.
#[post("/sign-in")]
pub async fn sign_in(
    state: web::Data<HttpState>,
    payload: web::Json<SignInRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from_parts(&payload.username, &payload.password)
        .map_err(map_auth_validation_error)?;
    let outcome = state.accounts.sign_in(credentials).await?;
    Ok(HttpResponse::Ok()
        .cookie(token_cookie(REFRESH_TOKEN_COOKIE, outcome.refresh_token))
        .cookie(token_cookie(USER_SUB_COOKIE, outcome.subject.as_str().to_owned()))
        .json(TokenResponse::from(outcome.tokens)))
}

/// Exchange the cookie-held refresh token for fresh tokens.
#[post("/refresh-token")]
pub async fn refresh_token(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<web::Json<TokenResponse>> {
    let refresh_token = req
        .cookie(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::unauthorized("refresh token cookie missing"))?;
    let subject = req
        .cookie(USER_SUB_COOKIE)
        .and_then(|cookie| Subject::new(cookie.value()).ok())
        .ok_or_else(|| Error::unauthorized("user cookie missing"))?;
    let tokens = state.accounts.refresh(subject, refresh_token).await?;
    Ok(web::Json(TokenResponse::from(tokens)))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
