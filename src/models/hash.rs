//! Keyed hashing of remember tokens.

use base64ct::{Base64Url, Encoding};
use hmac::Mac;
use sha2::Sha256;

use super::error::{Error, Result};

type HmacSha256 = hmac::Hmac<Sha256>;

/// HMAC-SHA256 keyed with the process-wide secret.
///
/// Remember tokens pass through this before storage. The digest is the
/// indexed column and the lookup key.
#[derive(Clone)]
pub struct Hmac {
    mac: HmacSha256,
}

impl Hmac {
    /// # Errors
    /// Returns an error if the key is rejected by the MAC implementation.
    pub fn new(key: &[u8]) -> Result<Self> {
        let mac = <HmacSha256 as Mac>::new_from_slice(key)
            .map_err(|e| Error::Internal(format!("invalid HMAC key: {e}")))?;
        Ok(Self { mac })
    }

    /// Hash the input and return the digest base64url encoded.
    #[must_use]
    pub fn hash(&self, input: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(input.as_bytes());
        Base64Url::encode_string(&mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for Hmac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hmac").field("key", &"***").finish()
    }
}
