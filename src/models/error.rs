//! Error kinds returned by the user models.
//!
//! Every model-level variant renders an internal diagnostic prefixed with
//! `models: `; storage failures render the underlying error unchanged.
//! Variants a user can trigger through form input also expose a public-safe
//! paraphrase through [`Error::public`]; everything else is considered unsafe
//! to show verbatim and must be replaced by a generic message at the request
//! boundary.

use thiserror::Error;

const MESSAGE_PREFIX: &str = "models: ";

#[derive(Debug, Error)]
pub enum Error {
    #[error("models: resource not found")]
    NotFound,
    #[error("models: ID provided was invalid")]
    InvalidId,
    #[error("models: incorrect password provided")]
    PasswordIncorrect,
    #[error("models: password is required")]
    PasswordRequired,
    #[error("models: password must be at least 8 characters long")]
    PasswordTooShort,
    #[error("models: email address is required")]
    EmailRequired,
    #[error("models: email address is not valid")]
    EmailInvalid,
    #[error("models: email address is already taken")]
    EmailTaken,
    #[error("models: remember token is required")]
    RememberRequired,
    #[error("models: remember token must be at least 32 bytes")]
    RememberTooShort,
    #[error("models: remember token is not valid base64")]
    RememberInvalid,
    #[error("models: password hash error: {0}")]
    PasswordHash(String),
    #[error("models: internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl Error {
    /// Message safe to show to an end user, if this kind has one.
    #[must_use]
    pub fn public(&self) -> Option<String> {
        match self {
            Self::NotFound
            | Self::PasswordIncorrect
            | Self::PasswordRequired
            | Self::PasswordTooShort
            | Self::EmailRequired
            | Self::EmailInvalid
            | Self::EmailTaken => Some(public_message(&self.to_string())),
            Self::InvalidId
            | Self::RememberRequired
            | Self::RememberTooShort
            | Self::RememberInvalid
            | Self::PasswordHash(_)
            | Self::Internal(_)
            | Self::Storage(_) => None,
        }
    }

    /// True for the distinguished "record absent" kind.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Strip the internal prefix and capitalize the first word.
fn public_message(internal: &str) -> String {
    let message = internal.strip_prefix(MESSAGE_PREFIX).unwrap_or(internal);
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
