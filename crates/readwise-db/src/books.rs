//! Book repository implementation.

use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row, Transaction};
use tracing::debug;

use readwise_core::{Book, Error, Result};

/// Translate an insert failure, reporting unique violations as conflicts.
pub(crate) fn map_insert_error(err: sqlx::Error, conflict: impl FnOnce() -> String) -> Error {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Error::Conflict(conflict())
        }
        _ => Error::Database(err),
    }
}

/// PostgreSQL book rows.
#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
}

impl PgBookRepository {
    /// Create a new PgBookRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a book inside the caller's transaction. The owning user row
    /// must already exist.
    pub async fn insert_tx(&self, tx: &mut Transaction<'_, Postgres>, book: &Book) -> Result<()> {
        sqlx::query(
            "INSERT INTO books (id, asin, title, authors, user_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&book.id)
        .bind(&book.asin)
        .bind(&book.title)
        .bind(&book.authors)
        .bind(&book.user_id)
        .bind(book.created_at)
        .bind(book.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_insert_error(e, || format!("Book {} already exists", book.asin)))?;

        debug!(
            subsystem = "db",
            component = "books",
            op = "insert",
            asin = %book.asin,
            user_id = %book.user_id,
            "Book row inserted"
        );
        Ok(())
    }

    /// The user's most recently created book, without highlights.
    pub async fn latest_for_user(&self, user_id: &str) -> Result<Option<Book>> {
        let row = sqlx::query(
            "SELECT id, asin, title, authors, user_id, created_at, updated_at
             FROM books
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|row| book_from_row(&row)))
    }
}

fn book_from_row(row: &PgRow) -> Book {
    Book {
        id: row.get("id"),
        asin: row.get("asin"),
        title: row.get("title"),
        authors: row.get("authors"),
        user_id: row.get("user_id"),
        highlights: Vec::new(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
