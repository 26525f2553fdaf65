//! Storage capability consumed by [`UserService`](super::UserService).

use std::future::Future;
use std::sync::Arc;

use super::error::Result;
use super::user::User;

/// Persistence for user records.
///
/// Lookups return [`Error::NotFound`](super::Error::NotFound) when no record
/// matches; any other failure is passed through unchanged. Implementations
/// store what they are given: normalization and hashing happen before a
/// record reaches them. They may enforce uniqueness of `email` and
/// `remember_hash` on their own and report an email conflict as
/// [`Error::EmailTaken`](super::Error::EmailTaken).
pub trait UserStore: Send + Sync {
    fn by_id(&self, id: i64) -> impl Future<Output = Result<User>> + Send;

    /// `email` is expected to be normalized already.
    fn by_email(&self, email: &str) -> impl Future<Output = Result<User>> + Send;

    fn by_remember_hash(&self, hash: &str) -> impl Future<Output = Result<User>> + Send;

    /// Insert a record and return its assigned id.
    fn create(&self, user: &User) -> impl Future<Output = Result<i64>> + Send;

    fn update(&self, user: &User) -> impl Future<Output = Result<()>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<()>> + Send;
}

impl<S: UserStore> UserStore for Arc<S> {
    fn by_id(&self, id: i64) -> impl Future<Output = Result<User>> + Send {
        (**self).by_id(id)
    }

    fn by_email(&self, email: &str) -> impl Future<Output = Result<User>> + Send {
        (**self).by_email(email)
    }

    fn by_remember_hash(&self, hash: &str) -> impl Future<Output = Result<User>> + Send {
        (**self).by_remember_hash(hash)
    }

    fn create(&self, user: &User) -> impl Future<Output = Result<i64>> + Send {
        (**self).create(user)
    }

    fn update(&self, user: &User) -> impl Future<Output = Result<()>> + Send {
        (**self).update(user)
    }

    fn delete(&self, id: i64) -> impl Future<Output = Result<()>> + Send {
        (**self).delete(id)
    }
}
