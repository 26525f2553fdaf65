//! Random remember tokens.
//!
//! Tokens are raw bytes from the OS CSPRNG encoded as URL-safe base64, so they
//! can travel in a cookie unchanged. Only their HMAC is ever stored.

use base64ct::{Base64Url, Encoding};
use rand::{rngs::OsRng, RngCore};

use super::error::{Error, Result};

/// Number of random bytes in a remember token.
pub const REMEMBER_TOKEN_BYTES: usize = 32;

/// Generate `n` random bytes.
///
/// # Errors
/// Returns an error if the OS random source fails.
pub fn bytes(n: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; n];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| Error::Internal(e.to_string()))?;
    Ok(buf)
}

/// Generate `n_bytes` random bytes and return them base64url encoded.
///
/// # Errors
/// Returns an error if the OS random source fails.
pub fn string(n_bytes: usize) -> Result<String> {
    Ok(Base64Url::encode_string(&bytes(n_bytes)?))
}

/// Create a new remember token for the auth cookie.
/// The raw value is only returned to the caller; storage keeps an HMAC.
///
/// # Errors
/// Returns an error if the OS random source fails.
pub fn remember_token() -> Result<String> {
    string(REMEMBER_TOKEN_BYTES)
}

/// Number of bytes encoded in a base64url token.
///
/// # Errors
/// Returns [`Error::RememberInvalid`] if the token is not valid base64url.
pub fn n_bytes(token: &str) -> Result<usize> {
    Base64Url::decode_vec(token)
        .map(|decoded| decoded.len())
        .map_err(|_| Error::RememberInvalid)
}
