use tracing::{info, instrument};

use super::config::UserConfig;
use super::error::{Error, Result};
use super::store::UserStore;
use super::token;
use super::user::User;
use super::validator::{self, UserValidator, CREATE_STEPS, DELETE_STEPS, UPDATE_STEPS};

/// User operations: the validation pipeline in front of a [`UserStore`].
#[derive(Clone, Debug)]
pub struct UserService<S> {
    store: S,
    validator: UserValidator,
}

impl<S: UserStore> UserService<S> {
    /// # Errors
    /// Returns an error if the configured secrets or cost are rejected.
    pub fn new(store: S, config: &UserConfig) -> Result<Self> {
        Ok(Self {
            store,
            validator: UserValidator::new(config)?,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn validator(&self) -> &UserValidator {
        &self.validator
    }

    /// # Errors
    /// Returns [`Error::NotFound`] if no user has this id.
    #[instrument(skip(self))]
    pub async fn by_id(&self, id: i64) -> Result<User> {
        self.store.by_id(id).await
    }

    /// Look up a user by email; the address is normalized first.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no user has this email.
    #[instrument(skip(self))]
    pub async fn by_email(&self, email: &str) -> Result<User> {
        self.store.by_email(&validator::normalize(email)).await
    }

    /// Look up a user by a plaintext remember token. Storage is queried with
    /// the token's HMAC, never with the token itself.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no user holds this token.
    #[instrument(skip_all)]
    pub async fn by_remember(&self, token: &str) -> Result<User> {
        let hash = self.validator.hmac().hash(token);
        self.store.by_remember_hash(&hash).await
    }

    /// Validate and persist a new user.
    ///
    /// The returned record carries the storage-assigned id and the plaintext
    /// remember token, which cannot be recovered later.
    ///
    /// # Errors
    /// Returns the first validation failure or the storage error.
    #[instrument(skip_all, fields(email = %user.email))]
    pub async fn create(&self, user: User) -> Result<User> {
        let mut user = self.validator.run(&self.store, user, CREATE_STEPS).await?;
        user.id = self.store.create(&user.for_storage()).await?;
        info!(user_id = user.id, "user created");
        Ok(user)
    }

    /// Validate and persist changes to an existing user. Empty `password` and
    /// `remember` keep the stored hashes.
    ///
    /// # Errors
    /// Returns the first validation failure or the storage error.
    #[instrument(skip_all, fields(user_id = user.id))]
    pub async fn update(&self, user: User) -> Result<User> {
        let user = self.validator.run(&self.store, user, UPDATE_STEPS).await?;
        self.store.update(&user.for_storage()).await?;
        info!("user updated");
        Ok(user)
    }

    /// # Errors
    /// Returns [`Error::InvalidId`] for a non-positive id without touching
    /// storage, otherwise the storage result.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let user = User {
            id,
            ..User::default()
        };
        self.validator.run(&self.store, user, DELETE_STEPS).await?;
        self.store.delete(id).await?;
        info!("user deleted");
        Ok(())
    }

    /// Authenticate with an email and password.
    ///
    /// # Errors
    /// - [`Error::NotFound`] if no user has this email;
    /// - [`Error::PasswordIncorrect`] if the password does not match;
    /// - [`Error::PasswordHash`] if the stored hash cannot be verified.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = self.by_email(email).await?;
        if self
            .validator
            .passwords()
            .verify(&user.password_hash, password)?
        {
            Ok(user)
        } else {
            Err(Error::PasswordIncorrect)
        }
    }

    /// Issue a fresh remember token for an existing user and persist its hash.
    /// The returned record carries the new plaintext token.
    ///
    /// # Errors
    /// Returns the update error, if any.
    #[instrument(skip_all, fields(user_id = user.id))]
    pub async fn rotate_remember(&self, user: User) -> Result<User> {
        let user = User {
            password: String::new(),
            remember: token::remember_token()?,
            ..user
        };
        self.update(user).await
    }
}
