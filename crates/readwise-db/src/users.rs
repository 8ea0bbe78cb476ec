//! User repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Transaction};

use readwise_core::{Error, Result};

/// PostgreSQL user rows. Users are created implicitly on first upload so
/// that the `user_id` foreign keys on books and highlights hold.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert the user row unless it already exists.
    pub async fn ensure_exists(&self, user_id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        self.ensure_exists_tx(&mut tx, user_id, Utc::now()).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    /// Transaction-scoped variant of [`ensure_exists`](Self::ensure_exists).
    pub async fn ensure_exists_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, created_at, updated_at) VALUES ($1, $2, $2)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(user_id)
        .bind(now)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }
}
