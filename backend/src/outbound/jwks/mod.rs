//! JWKS-backed bearer token verification.

mod verifier;

pub use verifier::JwksTokenVerifier;
