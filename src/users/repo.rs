use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewUser, User, UserChanges};

/// Storage capability the user service is built on.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Rows with `id > after` (all rows when `after` is `None`), ascending by id.
    async fn list(&self, after: Option<i64>, limit: i64) -> anyhow::Result<Vec<User>>;
    async fn get(&self, id: i64) -> anyhow::Result<Option<User>>;
    async fn create(&self, user: NewUser) -> anyhow::Result<User>;
    /// `None` when no row has this id.
    async fn update(&self, id: i64, changes: UserChanges) -> anyhow::Result<Option<User>>;
    /// Returns the number of rows deleted.
    async fn delete(&self, id: i64) -> anyhow::Result<u64>;
    /// Returns the number of rows updated.
    async fn set_blocked(&self, id: i64, blocked: bool) -> anyhow::Result<u64>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self, after: Option<i64>, limit: i64) -> anyhow::Result<Vec<User>> {
        // ids start at 1, so a missing cursor is the same as cursor 0
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, phone_number, password, blocked, registration_date
            FROM users
            WHERE id > $1
            ORDER BY id ASC
            LIMIT $2
            "#,
        )
        .bind(after.unwrap_or(0))
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("select users page")?;
        Ok(rows)
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, phone_number, password, blocked, registration_date
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("select user by id")?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, phone_number, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, phone_number, password, blocked, registration_date
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await
        .context("insert user")?;
        Ok(user)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = $1, last_name = $2, phone_number = $3, password = $4, blocked = $5
            WHERE id = $6
            RETURNING id, first_name, last_name, phone_number, password, blocked, registration_date
            "#,
        )
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.phone_number)
        .bind(&changes.password_hash)
        .bind(changes.blocked)
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("update user")?;
        Ok(user)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected())
    }

    async fn set_blocked(&self, id: i64, blocked: bool) -> anyhow::Result<u64> {
        let result = sqlx::query("UPDATE users SET blocked = $1 WHERE id = $2")
            .bind(blocked)
            .bind(id)
            .execute(&self.db)
            .await
            .context("update user blocked status")?;
        Ok(result.rows_affected())
    }
}
