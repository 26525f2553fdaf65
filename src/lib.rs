//! # Lenslocked (identity core)
//!
//! `lenslocked` owns user identity for the photo gallery: account records,
//! password hashing, remember tokens and the validation pipeline every write
//! goes through.
//!
//! ## Credentials
//!
//! Passwords are peppered and hashed with Argon2id; plaintext never reaches
//! storage. Remember tokens are 32 random bytes (Base64Url), stored only as an
//! HMAC-SHA256 digest so that a token can be looked up without being kept.
//!
//! ## Validation
//!
//! `create`, `update` and `delete` run an ordered, fail-fast list of steps
//! (normalize, hash, check) over a working copy of the user before the store
//! is touched. The first failing step decides the error.
//!
//! ## Errors
//!
//! [`models::Error`] separates user-safe messages from internal ones. The
//! [`alert`] module turns any error into something a user may see, falling
//! back to a generic message.

pub mod alert;
pub mod cli;
pub mod models;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
