use serde::{Deserialize, Serialize};

/// A user account.
///
/// `password` and `remember` are plaintext and transient: they are never
/// serialized and never handed to a [`UserStore`](super::UserStore).
/// An empty plaintext field means "unset" (on update: "leave unchanged").
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub password_hash: String,
    #[serde(skip)]
    pub remember: String,
    pub remember_hash: String,
}

impl User {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Copy of the record with every plaintext credential removed, as it is
    /// handed to storage.
    #[must_use]
    pub fn for_storage(&self) -> Self {
        Self {
            password: String::new(),
            remember: String::new(),
            ..self.clone()
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |value: &str| if value.is_empty() { "" } else { "***" };
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &redact(&self.password))
            .field("password_hash", &self.password_hash)
            .field("remember", &redact(&self.remember))
            .field("remember_hash", &self.remember_hash)
            .finish()
    }
}
