//! Bearer token authorization middleware.
//!
//! Verifies `Authorization: Bearer <token>` through the [`TokenVerifier`]
//! port and stores the resulting [`Claims`] in the request extensions.
//!
//! | Condition | Status |
//! |---|---|
//! | header absent | 401 |
//! | not exactly `Bearer <token>` | 400 |
//! | signing keys unavailable | 500 |
//! | token rejected | 400 |
//! | no subject claim | 401 |

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::{Ready, ready};
use tracing::{debug, warn};

use crate::domain::ports::{TokenVerificationError, TokenVerifier};
use crate::domain::{Claims, Error as DomainError};

fn bearer_token(headers: &HeaderMap) -> Result<String, DomainError> {
    let raw = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| DomainError::unauthorized("authorization header missing"))?;
    let value = raw
        .to_str()
        .map_err(|_| DomainError::invalid_request("invalid authorization header"))?;
    match value.split(' ').collect::<Vec<_>>().as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok((*token).to_owned()),
        _ => Err(DomainError::invalid_request("invalid authorization header")),
    }
}

fn map_verification_error(error: TokenVerificationError) -> DomainError {
    match error {
        TokenVerificationError::KeyFetch { message } => {
            warn!(%message, "signing key fetch failed");
            DomainError::internal(format!("error fetching keys: {message}"))
        }
        TokenVerificationError::Invalid { message } => {
            debug!(%message, "bearer token rejected");
            DomainError::invalid_request("error parsing token")
        }
        TokenVerificationError::MissingSubject => DomainError::unauthorized("invalid token claims"),
    }
}

/// Middleware requiring a verified bearer token.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use actix_web::{App, web};
/// use symptom_tracker::middleware::BearerAuth;
/// use symptom_tracker::outbound::jwks::JwksTokenVerifier;
///
/// let url = "https://cognito-idp.eu-west-2.amazonaws.com/pool/.well-known/jwks.json"
///     .parse()
///     .expect("jwks url");
/// let verifier = JwksTokenVerifier::new(url, None, Duration::from_secs(30)).expect("client");
/// let app = App::new().service(web::scope("/db").wrap(BearerAuth::new(Arc::new(verifier))));
/// ```
#[derive(Clone)]
pub struct BearerAuth {
    verifier: Arc<dyn TokenVerifier>,
}

impl BearerAuth {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service: Rc::new(service),
            verifier: Arc::clone(&self.verifier),
        }))
    }
}

/// Service wrapper produced by [`BearerAuth`].
pub struct BearerAuthMiddleware<S> {
    service: Rc<S>,
    verifier: Arc<dyn TokenVerifier>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let verifier = Arc::clone(&self.verifier);
        Box::pin(async move {
            let claims: Result<Claims, DomainError> = match bearer_token(req.headers()) {
                Ok(token) => verifier.verify(&token).await.map_err(map_verification_error),
                Err(error) => Err(error),
            };
            match claims {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(error) => {
                    let response = error.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::http::header::HeaderValue;
    use actix_web::{App, HttpRequest, HttpResponse, test as actix_test, web};
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::ports::MockTokenVerifier;

    fn claims(raw: Value) -> Claims {
        let Value::Object(map) = raw else {
            panic!("claims fixture must be an object");
        };
        Claims::from_map(map).expect("claims with subject")
    }

    #[rstest]
    #[case(None, Err(StatusCode::UNAUTHORIZED))]
    #[case(Some("Bearer"), Err(StatusCode::BAD_REQUEST))]
    #[case(Some("Basic abc"), Err(StatusCode::BAD_REQUEST))]
    #[case(Some("Bearer a b"), Err(StatusCode::BAD_REQUEST))]
    #[case(Some("Bearer  abc"), Err(StatusCode::BAD_REQUEST))]
    #[case(Some("Bearer abc.def.ghi"), Ok("abc.def.ghi"))]
    fn parses_authorization_header(
        #[case] header: Option<&str>,
        #[case] expected: Result<&str, StatusCode>,
    ) {
        let mut headers = HeaderMap::new();
        if let Some(value) = header {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(value).expect("header"));
        }
        let result = bearer_token(&headers);
        match expected {
            Ok(token) => assert_eq!(result.expect("token"), token),
            Err(status) => assert_eq!(result.expect_err("rejected").status_code(), status),
        }
    }

    #[rstest]
    #[case(TokenVerificationError::key_fetch("timeout"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(TokenVerificationError::invalid("expired"), StatusCode::BAD_REQUEST)]
    #[case(TokenVerificationError::missing_subject(), StatusCode::UNAUTHORIZED)]
    fn maps_verification_failures(
        #[case] error: TokenVerificationError,
        #[case] expected: StatusCode,
    ) {
        assert_eq!(map_verification_error(error).status_code(), expected);
    }

    async fn subject_handler(req: HttpRequest) -> HttpResponse {
        let subject = req
            .extensions()
            .get::<Claims>()
            .map(|claims| claims.subject().as_str().to_owned())
            .unwrap_or_default();
        HttpResponse::Ok().body(subject)
    }

    #[actix_web::test]
    async fn verified_claims_reach_the_handler() {
        let mut verifier = MockTokenVerifier::new();
        verifier
            .expect_verify()
            .withf(|token| token == "signed.jwt.value")
            .times(1)
            .returning(|_| Ok(claims(json!({ "sub": "user-123" }))));
        let app = actix_test::init_service(
            App::new()
                .wrap(BearerAuth::new(Arc::new(verifier)))
                .route("/", web::get().to(subject_handler)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/")
            .insert_header((AUTHORIZATION, "Bearer signed.jwt.value"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(res).await, "user-123");
    }

    #[actix_web::test]
    async fn missing_header_never_reaches_the_verifier() {
        let mut verifier = MockTokenVerifier::new();
        verifier.expect_verify().times(0);
        let app = actix_test::init_service(
            App::new()
                .wrap(BearerAuth::new(Arc::new(verifier)))
                .route("/", web::get().to(subject_handler)),
        )
        .await;

        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(actix_test::read_body(res).await, "authorization header missing");
    }

    #[actix_web::test]
    async fn key_fetch_failures_are_redacted() {
        let mut verifier = MockTokenVerifier::new();
        verifier
            .expect_verify()
            .returning(|_| Err(TokenVerificationError::key_fetch("dns error")));
        let app = actix_test::init_service(
            App::new()
                .wrap(BearerAuth::new(Arc::new(verifier)))
                .route("/", web::get().to(subject_handler)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/")
            .insert_header((AUTHORIZATION, "Bearer token"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(actix_test::read_body(res).await, "Internal server error");
    }
}
