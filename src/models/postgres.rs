//! Postgres-backed user store.

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, FromRow, PgPool, Row};
use tracing::{info, info_span, Instrument, Span};

use super::error::{Error, Result};
use super::store::UserStore;
use super::user::User;

const EMAIL_UNIQUE_INDEX: &str = "uix_users_email";

const MIGRATIONS: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL DEFAULT '',
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        remember_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    ",
    "CREATE UNIQUE INDEX IF NOT EXISTS uix_users_email ON users (email)",
    "CREATE UNIQUE INDEX IF NOT EXISTS uix_users_remember_hash ON users (remember_hash)",
];

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password: String::new(),
            password_hash: row.try_get("password_hash")?,
            remember: String::new(),
            remember_hash: row.try_get("remember_hash")?,
        })
    }
}

fn query_span(operation: &str, statement: &str) -> Span {
    info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = operation,
        db.statement = statement
    )
}

/// Name of the violated unique constraint, if `err` is a unique violation.
fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err)
            if db_err.code().is_some_and(|code| code.as_ref() == "23505") =>
        {
            Some(db_err.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

/// Map a write error, turning an email collision into [`Error::EmailTaken`].
fn write_error(err: sqlx::Error, context: &'static str) -> Error {
    match unique_violation(&err) {
        Some(constraint) if constraint == EMAIL_UNIQUE_INDEX => Error::EmailTaken,
        _ => Error::Storage(anyhow::Error::new(err).context(context)),
    }
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    /// Returns an error if the pool cannot connect.
    pub async fn connect(dsn: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(dsn)
            .await
            .context("failed to connect to database")?;
        Ok(Self::new(pool))
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the users table and its unique indexes if missing.
    ///
    /// # Errors
    /// Returns an error if a migration statement fails.
    pub async fn auto_migrate(&self) -> Result<()> {
        for statement in MIGRATIONS {
            sqlx::query(statement)
                .execute(&self.pool)
                .instrument(query_span("CREATE", statement))
                .await
                .context("failed to migrate users table")?;
        }
        Ok(())
    }

    /// Drop the users table and rebuild it.
    ///
    /// # Errors
    /// Returns an error if dropping or migrating fails.
    pub async fn destructive_reset(&self) -> Result<()> {
        let query = "DROP TABLE IF EXISTS users";
        sqlx::query(query)
            .execute(&self.pool)
            .instrument(query_span("DROP", query))
            .await
            .context("failed to drop users table")?;
        info!("users table dropped");
        self.auto_migrate().await
    }

    async fn fetch_one_by(&self, query: &'static str, span: Span, bind: FetchKey<'_>) -> Result<User> {
        let query = sqlx::query_as::<_, User>(query);
        let query = match bind {
            FetchKey::Id(id) => query.bind(id),
            FetchKey::Text(value) => query.bind(value),
        };
        query
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup user")?
            .ok_or(Error::NotFound)
    }
}

enum FetchKey<'a> {
    Id(i64),
    Text(&'a str),
}

const SELECT_BY_ID: &str =
    "SELECT id, name, email, password_hash, remember_hash FROM users WHERE id = $1";
const SELECT_BY_EMAIL: &str =
    "SELECT id, name, email, password_hash, remember_hash FROM users WHERE email = $1";
const SELECT_BY_REMEMBER_HASH: &str =
    "SELECT id, name, email, password_hash, remember_hash FROM users WHERE remember_hash = $1";

impl UserStore for PgUserStore {
    async fn by_id(&self, id: i64) -> Result<User> {
        let span = query_span("SELECT", SELECT_BY_ID);
        self.fetch_one_by(SELECT_BY_ID, span, FetchKey::Id(id)).await
    }

    async fn by_email(&self, email: &str) -> Result<User> {
        let span = query_span("SELECT", SELECT_BY_EMAIL);
        self.fetch_one_by(SELECT_BY_EMAIL, span, FetchKey::Text(email))
            .await
    }

    async fn by_remember_hash(&self, hash: &str) -> Result<User> {
        let span = query_span("SELECT", SELECT_BY_REMEMBER_HASH);
        self.fetch_one_by(SELECT_BY_REMEMBER_HASH, span, FetchKey::Text(hash))
            .await
    }

    async fn create(&self, user: &User) -> Result<i64> {
        let query = r"
            INSERT INTO users
                (name, email, password_hash, remember_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id
        ";
        let row = sqlx::query(query)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.remember_hash)
            .fetch_one(&self.pool)
            .instrument(query_span("INSERT", query))
            .await
            .map_err(|e| write_error(e, "failed to insert user"))?;
        let id: i64 = row
            .try_get("id")
            .context("failed to read inserted user id")?;
        Ok(id)
    }

    async fn update(&self, user: &User) -> Result<()> {
        let query = r"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, remember_hash = $5, updated_at = NOW()
            WHERE id = $1
        ";
        let result = sqlx::query(query)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.remember_hash)
            .execute(&self.pool)
            .instrument(query_span("UPDATE", query))
            .await
            .map_err(|e| write_error(e, "failed to update user"))?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let query = "DELETE FROM users WHERE id = $1";
        let result = sqlx::query(query)
            .bind(id)
            .execute(&self.pool)
            .instrument(query_span("DELETE", query))
            .await
            .context("failed to delete user")?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct TestDbError {
        code: Option<&'static str>,
        constraint: Option<&'static str>,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &'static str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    fn db_error(code: Option<&'static str>, constraint: Option<&'static str>) -> sqlx::Error {
        sqlx::Error::Database(Box::new(TestDbError { code, constraint }))
    }

    #[test]
    fn email_unique_violation_maps_to_email_taken() {
        let err = write_error(db_error(Some("23505"), Some(EMAIL_UNIQUE_INDEX)), "insert");
        assert!(matches!(err, Error::EmailTaken));
    }

    #[test]
    fn other_unique_violation_is_storage_error() {
        let err = write_error(
            db_error(Some("23505"), Some("uix_users_remember_hash")),
            "insert",
        );
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn non_unique_errors_pass_through() {
        assert!(unique_violation(&db_error(Some("40001"), None)).is_none());
        assert!(unique_violation(&sqlx::Error::RowNotFound).is_none());
        let err = write_error(sqlx::Error::PoolTimedOut, "insert");
        assert!(matches!(err, Error::Storage(_)));
    }
}
