//! In-memory stores backing the service and route tests.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::repo::UserStore;
use super::repo_types::{NewUser, User, UserChanges};

pub struct InMemoryUserStore {
    users: RwLock<BTreeMap<i64, User>>,
    next_id: AtomicI64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list(&self, after: Option<i64>, limit: i64) -> anyhow::Result<Vec<User>> {
        let users = self.users.read().await;
        let lower = after.map_or(Unbounded, Excluded);
        Ok(users
            .range((lower, Unbounded))
            .take(limit as usize)
            .map(|(_, u)| u.clone())
            .collect())
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = User {
            id,
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: user.phone_number,
            password_hash: user.password_hash,
            blocked: false,
            registration_date: OffsetDateTime::now_utc(),
        };
        self.users.write().await.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        let Some(row) = users.get_mut(&id) else {
            return Ok(None);
        };
        row.first_name = changes.first_name;
        row.last_name = changes.last_name;
        row.phone_number = changes.phone_number;
        row.password_hash = changes.password_hash;
        row.blocked = changes.blocked;
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<u64> {
        Ok(self.users.write().await.remove(&id).map_or(0, |_| 1))
    }

    async fn set_blocked(&self, id: i64, blocked: bool) -> anyhow::Result<u64> {
        match self.users.write().await.get_mut(&id) {
            Some(row) => {
                row.blocked = blocked;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

/// Fails every call, standing in for a lost database connection.
pub struct FailingUserStore;

#[async_trait]
impl UserStore for FailingUserStore {
    async fn list(&self, _after: Option<i64>, _limit: i64) -> anyhow::Result<Vec<User>> {
        anyhow::bail!("connection refused")
    }
    async fn get(&self, _id: i64) -> anyhow::Result<Option<User>> {
        anyhow::bail!("connection refused")
    }
    async fn create(&self, _user: NewUser) -> anyhow::Result<User> {
        anyhow::bail!("connection refused")
    }
    async fn update(&self, _id: i64, _changes: UserChanges) -> anyhow::Result<Option<User>> {
        anyhow::bail!("connection refused")
    }
    async fn delete(&self, _id: i64) -> anyhow::Result<u64> {
        anyhow::bail!("connection refused")
    }
    async fn set_blocked(&self, _id: i64, _blocked: bool) -> anyhow::Result<u64> {
        anyhow::bail!("connection refused")
    }
}
