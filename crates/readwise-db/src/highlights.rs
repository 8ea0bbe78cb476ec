//! Highlight repository implementation.

use sqlx::{Pool, Postgres, Row, Transaction};
use tracing::trace;

use readwise_core::{Error, Highlight, Result};

/// PostgreSQL highlight rows.
#[derive(Clone)]
pub struct PgHighlightRepository {
    pool: Pool<Postgres>,
}

const INSERT_HIGHLIGHT: &str = "INSERT INTO highlights
    (id, book_id, highlight, location, location_url, note, is_note_only, position, user_id,
     created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)";

macro_rules! bind_highlight {
    ($query:expr, $h:expr) => {
        $query
            .bind($h.id)
            .bind(&$h.book_id)
            .bind(&$h.text)
            .bind($h.location)
            .bind(&$h.location_url)
            .bind(&$h.note)
            .bind($h.is_note_only)
            .bind($h.position)
            .bind(&$h.user_id)
            .bind($h.created_at)
            .bind($h.updated_at)
    };
}

impl PgHighlightRepository {
    /// Create a new PgHighlightRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert rows one statement at a time, each committed on its own.
    ///
    /// Stops at the first failure; rows inserted before it remain.
    pub async fn insert_each(&self, rows: &[Highlight]) -> Result<usize> {
        for (written, h) in rows.iter().enumerate() {
            bind_highlight!(sqlx::query(INSERT_HIGHLIGHT), h)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    tracing::warn!(
                        subsystem = "db",
                        component = "highlights",
                        op = "insert_each",
                        written,
                        error = %e,
                        "Highlight insert failed; earlier rows remain committed"
                    );
                    Error::Database(e)
                })?;
        }
        Ok(rows.len())
    }

    /// Insert all rows inside the caller's transaction.
    pub async fn insert_all_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        rows: &[Highlight],
    ) -> Result<usize> {
        for h in rows {
            bind_highlight!(sqlx::query(INSERT_HIGHLIGHT), h)
                .execute(&mut **tx)
                .await
                .map_err(Error::Database)?;
            trace!(
                subsystem = "db",
                component = "highlights",
                op = "insert",
                book_id = %h.book_id,
                position = h.position,
                "Highlight row inserted"
            );
        }
        Ok(rows.len())
    }

    /// All highlights of a book in upload order.
    pub async fn list_for_book(&self, book_id: &str) -> Result<Vec<Highlight>> {
        let rows = sqlx::query(
            "SELECT id, book_id, highlight, location, location_url, note, is_note_only,
                    position, user_id, created_at, updated_at
             FROM highlights
             WHERE book_id = $1
             ORDER BY position, created_at",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let highlights = rows
            .into_iter()
            .map(|row| Highlight {
                id: row.get("id"),
                book_id: row.get("book_id"),
                text: row.get("highlight"),
                location: row.get("location"),
                location_url: row.get("location_url"),
                note: row.get("note"),
                is_note_only: row.get("is_note_only"),
                position: row.get("position"),
                user_id: row.get("user_id"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            })
            .collect();

        Ok(highlights)
    }
}
