//! Cognito user pool adapter.
//!
//! Implements the `IdentityProvider` port with the AWS SDK. Credentials come
//! from the default AWS provider chain; the app client id and secret come
//! from settings.

mod client;
mod secret_hash;

pub use client::{CognitoIdentityProvider, CognitoSettings};
pub use secret_hash::SecretHasher;
