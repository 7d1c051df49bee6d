//! Cognito `SECRET_HASH` computation.
//!
//! App clients with a secret require every call to carry
//! `base64(HMAC-SHA256(key = client_secret, msg = username || client_id))`,
//! standard alphabet with padding.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// App client identity used to sign provider calls.
#[derive(Clone)]
pub struct SecretHasher {
    client_id: String,
    client_secret: Zeroizing<String>,
}

impl SecretHasher {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Zeroizing::new(client_secret.into()),
        }
    }

    /// App client id the hashes are bound to.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Secret hash for `username`.
    ///
    /// # Examples
    /// ```
    /// use symptom_tracker::outbound::cognito::SecretHasher;
    ///
    /// let hasher = SecretHasher::new("client", "secret");
    /// assert_eq!(
    ///     hasher.hash("user").unwrap(),
    ///     "wvW87lzZoI+qQCVGmWVBJLlucdJ65huAVP1z+0MgA6E="
    /// );
    /// ```
    pub fn hash(&self, username: &str) -> Result<String, InvalidLength> {
        let mut mac = HmacSha256::new_from_slice(self.client_secret.as_bytes())?;
        mac.update(username.as_bytes());
        mac.update(self.client_id.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

impl fmt::Debug for SecretHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretHasher")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
