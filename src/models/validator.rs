//! Ordered validation pipeline for user records.
//!
//! A pipeline is a slice of [`Step`]s run strictly in order over an owned
//! working copy of a [`User`]. Each step either hands back the (possibly
//! transformed) copy or fails; the first failure aborts the run and is
//! returned untouched.
//!
//! Order matters because steps gate on the output of earlier steps:
//! - hashing runs before its "hash required" guard;
//! - the remember token is assigned before it is measured and hashed;
//! - the email is normalized before it is checked and looked up.

use regex::Regex;
use secrecy::ExposeSecret;
use tracing::{debug, trace};

use super::config::UserConfig;
use super::error::{Error, Result};
use super::hash::Hmac;
use super::password::PasswordHasher;
use super::store::UserStore;
use super::token;
use super::user::User;

pub const MIN_PASSWORD_CHARS: usize = 8;

const EMAIL_PATTERN: &str = r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,16}$";

/// A single named pipeline step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    PasswordRequired,
    PasswordMinLength,
    HashPassword,
    PasswordHashRequired,
    AssignRememberIfUnset,
    RememberMinBytes,
    HashRemember,
    RememberHashRequired,
    NormalizeEmail,
    RequireEmail,
    EmailFormat,
    EmailAvailable,
    IdGreaterThanZero,
}

impl Step {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PasswordRequired => "password_required",
            Self::PasswordMinLength => "password_min_length",
            Self::HashPassword => "hash_password",
            Self::PasswordHashRequired => "password_hash_required",
            Self::AssignRememberIfUnset => "assign_remember_if_unset",
            Self::RememberMinBytes => "remember_min_bytes",
            Self::HashRemember => "hash_remember",
            Self::RememberHashRequired => "remember_hash_required",
            Self::NormalizeEmail => "normalize_email",
            Self::RequireEmail => "require_email",
            Self::EmailFormat => "email_format",
            Self::EmailAvailable => "email_available",
            Self::IdGreaterThanZero => "id_greater_than_zero",
        }
    }
}

pub const CREATE_STEPS: &[Step] = &[
    Step::PasswordRequired,
    Step::PasswordMinLength,
    Step::HashPassword,
    Step::PasswordHashRequired,
    Step::AssignRememberIfUnset,
    Step::RememberMinBytes,
    Step::HashRemember,
    Step::RememberHashRequired,
    Step::NormalizeEmail,
    Step::RequireEmail,
    Step::EmailFormat,
    Step::EmailAvailable,
];

/// Password and remember token are optional on update: an empty plaintext
/// means "leave unchanged" and the matching steps pass the record through.
pub const UPDATE_STEPS: &[Step] = &[
    Step::PasswordMinLength,
    Step::HashPassword,
    Step::PasswordHashRequired,
    Step::RememberMinBytes,
    Step::HashRemember,
    Step::RememberHashRequired,
    Step::NormalizeEmail,
    Step::RequireEmail,
    Step::EmailFormat,
    Step::EmailAvailable,
];

pub const DELETE_STEPS: &[Step] = &[Step::IdGreaterThanZero];

/// Runs pipelines; owns the secret-keyed hashers and the email pattern.
#[derive(Clone, Debug)]
pub struct UserValidator {
    passwords: PasswordHasher,
    hmac: Hmac,
    email_regex: Regex,
}

impl UserValidator {
    /// # Errors
    /// Returns an error if the password cost or HMAC key is rejected.
    pub fn new(config: &UserConfig) -> Result<Self> {
        let passwords = PasswordHasher::new(config.pepper().clone(), config.password_cost())?;
        let hmac = Hmac::new(config.hmac_key().expose_secret().as_bytes())?;
        let email_regex = Regex::new(EMAIL_PATTERN)
            .map_err(|e| Error::Internal(format!("invalid email pattern: {e}")))?;
        Ok(Self {
            passwords,
            hmac,
            email_regex,
        })
    }

    #[must_use]
    pub fn passwords(&self) -> &PasswordHasher {
        &self.passwords
    }

    #[must_use]
    pub fn hmac(&self) -> &Hmac {
        &self.hmac
    }

    /// Run `steps` in order over `user`, stopping at the first failure.
    ///
    /// # Errors
    /// Returns the error of the first failing step.
    pub async fn run<S: UserStore>(&self, store: &S, user: User, steps: &[Step]) -> Result<User> {
        let mut user = user;
        for &step in steps {
            trace!(step = step.name(), "running validation step");
            user = match self.apply(store, step, user).await {
                Ok(user) => user,
                Err(e) => {
                    debug!(step = step.name(), error = %e, "validation step failed");
                    return Err(e);
                }
            };
        }
        Ok(user)
    }

    async fn apply<S: UserStore>(&self, store: &S, step: Step, user: User) -> Result<User> {
        match step {
            Step::PasswordRequired => password_required(user),
            Step::PasswordMinLength => password_min_length(user),
            Step::HashPassword => self.hash_password(user),
            Step::PasswordHashRequired => password_hash_required(user),
            Step::AssignRememberIfUnset => assign_remember_if_unset(user),
            Step::RememberMinBytes => remember_min_bytes(user),
            Step::HashRemember => Ok(self.hash_remember(user)),
            Step::RememberHashRequired => remember_hash_required(user),
            Step::NormalizeEmail => Ok(normalize_email(user)),
            Step::RequireEmail => require_email(user),
            Step::EmailFormat => self.email_format(user),
            Step::EmailAvailable => email_available(store, user).await,
            Step::IdGreaterThanZero => id_greater_than_zero(user),
        }
    }

    /// Hash the plaintext password and clear it. No-op when it is empty.
    ///
    /// # Errors
    /// Returns an error if hashing fails.
    pub fn hash_password(&self, mut user: User) -> Result<User> {
        if user.password.is_empty() {
            return Ok(user);
        }
        user.password_hash = self.passwords.hash(&user.password)?;
        user.password.clear();
        Ok(user)
    }

    /// Set `remember_hash` from the plaintext token. No-op when it is empty.
    ///
    /// The plaintext stays on the working copy so it can be handed back to the
    /// caller; [`User::for_storage`] drops it before persistence.
    #[must_use]
    pub fn hash_remember(&self, mut user: User) -> User {
        if user.remember.is_empty() {
            return user;
        }
        user.remember_hash = self.hmac.hash(&user.remember);
        user
    }

    /// # Errors
    /// Returns [`Error::EmailInvalid`] for a non-empty address that does not
    /// look like `local@domain.tld`.
    pub fn email_format(&self, user: User) -> Result<User> {
        if user.email.is_empty() || self.email_regex.is_match(&user.email) {
            Ok(user)
        } else {
            Err(Error::EmailInvalid)
        }
    }
}

/// Lowercase then trim an email address.
#[must_use]
pub fn normalize(email: &str) -> String {
    email.to_lowercase().trim().to_string()
}

/// # Errors
/// Returns [`Error::PasswordRequired`] when the plaintext password is empty.
pub fn password_required(user: User) -> Result<User> {
    if user.password.is_empty() {
        return Err(Error::PasswordRequired);
    }
    Ok(user)
}

/// # Errors
/// Returns [`Error::PasswordTooShort`] for a non-empty password under
/// [`MIN_PASSWORD_CHARS`] characters.
pub fn password_min_length(user: User) -> Result<User> {
    if user.password.is_empty() || user.password.chars().count() >= MIN_PASSWORD_CHARS {
        Ok(user)
    } else {
        Err(Error::PasswordTooShort)
    }
}

/// Guards against a hashing step that silently produced nothing.
///
/// # Errors
/// Returns [`Error::PasswordRequired`] when no hash is present.
pub fn password_hash_required(user: User) -> Result<User> {
    if user.password_hash.is_empty() {
        return Err(Error::PasswordRequired);
    }
    Ok(user)
}

/// Generate a remember token unless the caller supplied one.
///
/// # Errors
/// Returns an error if the random source fails.
pub fn assign_remember_if_unset(mut user: User) -> Result<User> {
    if user.remember.is_empty() {
        user.remember = token::remember_token()?;
    }
    Ok(user)
}

/// # Errors
/// Returns [`Error::RememberTooShort`] when a non-empty token decodes to fewer
/// than [`token::REMEMBER_TOKEN_BYTES`] bytes, or
/// [`Error::RememberInvalid`] when it does not decode at all.
pub fn remember_min_bytes(user: User) -> Result<User> {
    if user.remember.is_empty() {
        return Ok(user);
    }
    if token::n_bytes(&user.remember)? < token::REMEMBER_TOKEN_BYTES {
        return Err(Error::RememberTooShort);
    }
    Ok(user)
}

/// # Errors
/// Returns [`Error::RememberRequired`] when no remember hash is present.
pub fn remember_hash_required(user: User) -> Result<User> {
    if user.remember_hash.is_empty() {
        return Err(Error::RememberRequired);
    }
    Ok(user)
}

#[must_use]
pub fn normalize_email(mut user: User) -> User {
    user.email = normalize(&user.email);
    user
}

/// # Errors
/// Returns [`Error::EmailRequired`] when the email is empty.
pub fn require_email(user: User) -> Result<User> {
    if user.email.is_empty() {
        return Err(Error::EmailRequired);
    }
    Ok(user)
}

/// The email is available when nobody has it, or when the record holding it
/// is the subject itself.
///
/// # Errors
/// Returns [`Error::EmailTaken`] on conflict; storage failures other than
/// not-found pass through.
pub async fn email_available<S: UserStore>(store: &S, user: User) -> Result<User> {
    match store.by_email(&user.email).await {
        Err(Error::NotFound) => Ok(user),
        Err(e) => Err(e),
        Ok(existing) if user.id > 0 && existing.id == user.id => Ok(user),
        Ok(_) => Err(Error::EmailTaken),
    }
}

/// # Errors
/// Returns [`Error::InvalidId`] unless the id is strictly positive.
pub fn id_greater_than_zero(user: User) -> Result<User> {
    if user.id <= 0 {
        return Err(Error::InvalidId);
    }
    Ok(user)
}
