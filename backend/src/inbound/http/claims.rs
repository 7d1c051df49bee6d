//! Extractor for the claims stored by the bearer authorization middleware.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::{Claims, Error, Subject};

/// Verified caller of a protected route.
///
/// Extraction fails with `401` when the route is not behind
/// [`BearerAuth`](crate::middleware::BearerAuth).
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(Claims);

impl AuthenticatedUser {
    pub fn subject(&self) -> &Subject {
        self.0.subject()
    }

    pub fn claims(&self) -> &Claims {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        ready(claims.map(Self).ok_or_else(|| Error::unauthorized("authentication required")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use serde_json::{Map, Value};

    #[actix_web::test]
    async fn reads_claims_from_extensions() {
        let mut raw = Map::new();
        raw.insert("sub".into(), Value::String("abc-123".into()));
        let claims = Claims::from_map(raw).expect("claims");

        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(claims);
        let user = AuthenticatedUser::extract(&req).await.expect("extracted");
        assert_eq!(user.subject().as_str(), "abc-123");
    }

    #[actix_web::test]
    async fn missing_claims_are_unauthorised() {
        let req = TestRequest::default().to_http_request();
        let error = AuthenticatedUser::extract(&req).await.expect_err("no claims");
        assert_eq!(error.code(), crate::domain::ErrorCode::Unauthorized);
    }
}
