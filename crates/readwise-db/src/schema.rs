//! Schema bootstrap.
//!
//! The tables are a fixed contract; this creates them if absent and never
//! alters existing ones.

use sqlx::{Pool, Postgres};
use tracing::info;

use readwise_core::{Error, Result};

/// Statements run, in order, inside one transaction by [`ensure_schema`].
pub const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          TEXT PRIMARY KEY,
        email       TEXT UNIQUE,
        password    TEXT,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS books (
        id          TEXT PRIMARY KEY,
        asin        TEXT NOT NULL UNIQUE,
        title       TEXT NOT NULL,
        authors     TEXT NOT NULL DEFAULT '',
        user_id     TEXT NOT NULL REFERENCES users(id),
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_books_user_created ON books (user_id, created_at DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS highlights (
        id            UUID PRIMARY KEY,
        book_id       TEXT NOT NULL REFERENCES books(id) ON DELETE CASCADE,
        highlight     TEXT NOT NULL,
        location      BIGINT NOT NULL DEFAULT 0,
        location_url  TEXT,
        note          TEXT,
        is_note_only  BOOLEAN NOT NULL DEFAULT FALSE,
        position      INTEGER NOT NULL,
        user_id       TEXT NOT NULL REFERENCES users(id),
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_highlights_book_position ON highlights (book_id, position)",
];

/// Create the `users`, `books` and `highlights` tables if they do not exist.
pub async fn ensure_schema(pool: &Pool<Postgres>) -> Result<()> {
    let mut tx = pool.begin().await.map_err(Error::Database)?;
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(*statement)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
    }
    tx.commit().await.map_err(Error::Database)?;

    info!(
        subsystem = "db",
        component = "schema",
        op = "ensure",
        statements = SCHEMA_STATEMENTS.len(),
        "Schema ready"
    );
    Ok(())
}
