//! In-process user store.
//!
//! Keeps records in a map behind a `tokio` lock. It enforces the same unique
//! constraints as the Postgres schema, which makes it a faithful stand-in for
//! tests and local tooling.

use std::collections::BTreeMap;

use anyhow::anyhow;
use tokio::sync::RwLock;
use tracing::debug;

use super::error::{Error, Result};
use super::store::UserStore;
use super::user::User;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, User>,
    last_id: i64,
}

impl Table {
    fn find(&self, predicate: impl Fn(&User) -> bool) -> Result<User> {
        self.rows
            .values()
            .find(|user| predicate(user))
            .cloned()
            .ok_or(Error::NotFound)
    }

    /// Reject a row whose unique columns collide with another row.
    fn check_unique(&self, user: &User) -> Result<()> {
        for row in self.rows.values().filter(|row| row.id != user.id) {
            if row.email == user.email {
                return Err(Error::EmailTaken);
            }
            if !user.remember_hash.is_empty() && row.remember_hash == user.remember_hash {
                return Err(Error::Storage(anyhow!(
                    "duplicate key value violates unique constraint on remember_hash"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    table: RwLock<Table>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored row, ordered by id.
    pub async fn all(&self) -> Vec<User> {
        self.table.read().await.rows.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl UserStore for MemoryUserStore {
    async fn by_id(&self, id: i64) -> Result<User> {
        self.table.read().await.rows.get(&id).cloned().ok_or(Error::NotFound)
    }

    async fn by_email(&self, email: &str) -> Result<User> {
        self.table.read().await.find(|user| user.email == email)
    }

    async fn by_remember_hash(&self, hash: &str) -> Result<User> {
        self.table
            .read()
            .await
            .find(|user| user.remember_hash == hash)
    }

    async fn create(&self, user: &User) -> Result<i64> {
        let mut table = self.table.write().await;
        let id = table.last_id + 1;
        let row = User {
            id,
            ..user.for_storage()
        };
        table.check_unique(&row)?;
        table.rows.insert(id, row);
        table.last_id = id;
        debug!(user_id = id, "memory store: user created");
        Ok(id)
    }

    async fn update(&self, user: &User) -> Result<()> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&user.id) {
            return Err(Error::NotFound);
        }
        let row = user.for_storage();
        table.check_unique(&row)?;
        table.rows.insert(row.id, row);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.table
            .write()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NotFound)
    }
}
