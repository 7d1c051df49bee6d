//! Reqwest-backed `TokenVerifier` adapter.
//!
//! The key set is fetched from the provider on every verification, so key
//! rotation is picked up without a restart. Tokens must be RS256-signed, must
//! carry `exp`, and must name the configured issuer when one is set.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use reqwest::{Client, StatusCode, Url};
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::Claims;
use crate::domain::ports::{TokenVerificationError, TokenVerifier};

/// Verifier that validates tokens against a published JSON Web Key Set.
pub struct JwksTokenVerifier {
    client: Client,
    jwks_url: Url,
    issuer: Option<String>,
}

impl JwksTokenVerifier {
    /// Build a verifier for `jwks_url`, optionally pinning the `iss` claim.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        jwks_url: Url,
        issuer: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            jwks_url,
            issuer,
        })
    }

    async fn fetch_keys(&self) -> Result<JwkSet, TokenVerificationError> {
        let response = self
            .client
            .get(self.jwks_url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| TokenVerificationError::key_fetch(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| TokenVerificationError::key_fetch(error.to_string()))?;
        if status != StatusCode::OK {
            return Err(TokenVerificationError::key_fetch(format!(
                "status {}",
                status.as_u16()
            )));
        }
        parse_key_set(body.as_ref())
    }
}

#[async_trait]
impl TokenVerifier for JwksTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, TokenVerificationError> {
        let keys = self.fetch_keys().await?;
        verify_with_keys(token, &keys, self.issuer.as_deref())
    }
}

fn parse_key_set(body: &[u8]) -> Result<JwkSet, TokenVerificationError> {
    serde_json::from_slice(body)
        .map_err(|error| TokenVerificationError::key_fetch(format!("invalid key set: {error}")))
}

fn select_key<'a>(keys: &'a JwkSet, kid: Option<&str>) -> Option<&'a Jwk> {
    match kid {
        Some(kid) => keys.find(kid),
        None if keys.keys.len() == 1 => keys.keys.first(),
        None => None,
    }
}

fn verify_with_keys(
    token: &str,
    keys: &JwkSet,
    issuer: Option<&str>,
) -> Result<Claims, TokenVerificationError> {
    let header = decode_header(token)
        .map_err(|error| TokenVerificationError::invalid(format!("malformed token: {error}")))?;
    let jwk = select_key(keys, header.kid.as_deref()).ok_or_else(|| {
        debug!(kid = ?header.kid, "no signing key matches token");
        TokenVerificationError::invalid("no matching signing key")
    })?;
    let key = DecodingKey::from_jwk(jwk)
        .map_err(|error| TokenVerificationError::invalid(format!("unusable signing key: {error}")))?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp"]);
    if let Some(issuer) = issuer {
        validation.set_issuer(&[issuer]);
    }

    let data = decode::<Map<String, Value>>(token, &key, &validation)
        .map_err(|error| TokenVerificationError::invalid(error.to_string()))?;
    Claims::from_map(data.claims).ok_or_else(TokenVerificationError::missing_subject)
}

#[cfg(test)]
mod tests {
    //! Coverage for signature and claim validation against a fixed key pair.

    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use rstest::{fixture, rstest};
    use serde_json::json;

    const PRIVATE_KEY_PEM: &str = include_str!("test_rsa.pem");
    const MODULUS: &str = "vAmUF5cnu08UYiCuzI-NGJ5iTcddw47msEaoOIC3tCtMMyDhi5hO5Vylwi7dwOLj_SBXHxfaJXlu-5Wp8HG7umsrZQeJXeVhEwRWJe3G7Uzoj-IJxcNMfAZtQjbBp0QxJVNtlaglQlOfHndce-a9JnoAHirZtjqGiRTyp9rNzxCoT5t4NHFfUX4xGOe3uPcV8-8o_J3_P_GrYIw0SMO6SiMNKV7PZbq1fraILCENzYF9YwgU61Xh9BuiE0W0P0Z6Ohdzv1JzWExnaj6HhbTMs1xchgZph_OTAEnTmC5c7rWhqfJTH9IAQ0LMVVM7dNUjlWWHezLWGavWctZ9RD4NAQ";
    const ISSUER: &str = "https://cognito-idp.eu-west-2.amazonaws.com/eu-west-2_pool";

    #[fixture]
    fn keys() -> JwkSet {
        serde_json::from_value(json!({
            "keys": [{
                "kty": "RSA",
                "kid": "test-key",
                "use": "sig",
                "alg": "RS256",
                "n": MODULUS,
                "e": "AQAB"
            }]
        }))
        .expect("key set fixture")
    }

    fn sign(claims: &Value, kid: Option<&str>) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = kid.map(str::to_owned);
        let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM.as_bytes()).expect("private key");
        encode(&header, claims, &key).expect("signed token")
    }

    fn claims_expiring_in(seconds: i64) -> Value {
        json!({
            "sub": "3f2b0c9e-1111-4a6b-9c51-2b7a1c0d9e10",
            "email": "ada@example.com",
            "iss": ISSUER,
            "exp": Utc::now().timestamp() + seconds,
        })
    }

    #[rstest]
    fn accepts_valid_token(keys: JwkSet) {
        let token = sign(&claims_expiring_in(3600), Some("test-key"));
        let claims = verify_with_keys(&token, &keys, Some(ISSUER)).expect("valid token");
        assert_eq!(
            claims.subject().as_str(),
            "3f2b0c9e-1111-4a6b-9c51-2b7a1c0d9e10"
        );
        assert_eq!(claims.email(), Some("ada@example.com"));
    }

    #[rstest]
    fn single_key_sets_accept_tokens_without_kid(keys: JwkSet) {
        let token = sign(&claims_expiring_in(3600), None);
        assert!(verify_with_keys(&token, &keys, None).is_ok());
    }

    #[rstest]
    fn rejects_expired_token(keys: JwkSet) {
        let token = sign(&claims_expiring_in(-3600), Some("test-key"));
        let error = verify_with_keys(&token, &keys, None).expect_err("expired");
        assert!(matches!(error, TokenVerificationError::Invalid { .. }));
    }

    #[rstest]
    fn rejects_foreign_issuer(keys: JwkSet) {
        let token = sign(&claims_expiring_in(3600), Some("test-key"));
        let error = verify_with_keys(&token, &keys, Some("https://issuer.invalid"))
            .expect_err("issuer mismatch");
        assert!(matches!(error, TokenVerificationError::Invalid { .. }));
    }

    #[rstest]
    fn rejects_unknown_kid(keys: JwkSet) {
        let token = sign(&claims_expiring_in(3600), Some("rotated-away"));
        let error = verify_with_keys(&token, &keys, None).expect_err("unknown kid");
        assert_eq!(
            error,
            TokenVerificationError::invalid("no matching signing key")
        );
    }

    #[rstest]
    fn rejects_hmac_signed_token(keys: JwkSet) {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some("test-key".to_owned());
        let token = encode(
            &header,
            &claims_expiring_in(3600),
            &EncodingKey::from_secret(b"shared"),
        )
        .expect("hmac token");
        let error = verify_with_keys(&token, &keys, None).expect_err("wrong algorithm");
        assert!(matches!(error, TokenVerificationError::Invalid { .. }));
    }

    #[rstest]
    fn reports_missing_subject(keys: JwkSet) {
        let token = sign(&json!({ "exp": Utc::now().timestamp() + 3600 }), Some("test-key"));
        assert_eq!(
            verify_with_keys(&token, &keys, None),
            Err(TokenVerificationError::MissingSubject)
        );
    }

    #[rstest]
    #[case("")]
    #[case("not-a-jwt")]
    #[case("a.b")]
    fn rejects_malformed_tokens(keys: JwkSet, #[case] token: &str) {
        let error = verify_with_keys(token, &keys, None).expect_err("malformed");
        assert!(matches!(error, TokenVerificationError::Invalid { .. }));
    }

    #[rstest]
    fn invalid_key_set_is_a_fetch_error() {
        let error = parse_key_set(b"<html>").expect_err("not json");
        assert!(matches!(error, TokenVerificationError::KeyFetch { .. }));
    }
}
