//! # readwise-db
//!
//! PostgreSQL storage layer for the readwise highlights API.
//!
//! This crate provides:
//! - Connection pool management
//! - Idempotent schema bootstrap
//! - User, book and highlight repositories
//! - [`Database`], the relational [`Storage`] implementation
//! - [`MemoryStore`], an in-memory [`Storage`] for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use readwise_db::{Database, PoolConfig};
//! use readwise_core::Storage;
//!
//! let db = Database::connect("postgres://localhost/highlights", &PoolConfig::default()).await?;
//! db.ensure_schema().await?;
//! let book = db.get_book("user_001").await?;
//! ```
pub mod books;
pub mod highlights;
pub mod memory;
pub mod pool;
pub mod schema;
pub mod users;

// Always compiled so integration tests can use the fixtures
pub mod test_fixtures;

use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

pub use readwise_core::*;

pub use books::PgBookRepository;
pub use highlights::PgHighlightRepository;
pub use memory::MemoryStore;
pub use pool::{create_pool, log_pool_metrics, PoolConfig};
pub use users::PgUserRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Implicitly created user rows.
    pub users: PgUserRepository,
    /// Book rows keyed by catalog identifier.
    pub books: PgBookRepository,
    /// Highlight rows.
    pub highlights: PgHighlightRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            books: PgBookRepository::new(pool.clone()),
            highlights: PgHighlightRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to `url` with the given pool settings.
    pub async fn connect(url: &str, config: &PoolConfig) -> Result<Self> {
        let pool = create_pool(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    /// Close every pooled connection. Waits for checked-out connections to
    /// be returned first.
    pub async fn close(&self) {
        self.pool.close().await;
        info!(
            subsystem = "db",
            component = "pool",
            op = "close",
            "Database connection pool closed"
        );
    }
}

#[async_trait]
impl Storage for Database {
    async fn ensure_schema(&self) -> Result<()> {
        schema::ensure_schema(&self.pool).await
    }

    async fn create_book(&self, book: &Book) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        self.users
            .ensure_exists_tx(&mut tx, &book.user_id, book.created_at)
            .await?;
        self.books.insert_tx(&mut tx, book).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn save_highlights(&self, extract: &RawExtractBook, user_id: &str) -> Result<usize> {
        self.users.ensure_exists(user_id).await?;
        let rows = extract.highlight_rows(user_id, Utc::now());
        self.highlights.insert_each(&rows).await
    }

    async fn get_book(&self, user_id: &str) -> Result<Book> {
        let mut book = self
            .books
            .latest_for_user(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No book found for user {}", user_id)))?;
        book.highlights = self.highlights.list_for_book(&book.id).await?;
        Ok(book)
    }

    /// User, book and highlights in one transaction. Dropping the future
    /// before commit (client gone, deadline hit) rolls everything back.
    async fn ingest_extract(
        &self,
        book: &Book,
        extract: &RawExtractBook,
        user_id: &str,
    ) -> Result<usize> {
        let start = Instant::now();
        let rows = extract.highlight_rows(user_id, book.created_at);

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        self.users
            .ensure_exists_tx(&mut tx, user_id, book.created_at)
            .await?;
        self.books.insert_tx(&mut tx, book).await?;
        let written = match self.highlights.insert_all_tx(&mut tx, &rows).await {
            Ok(n) => n,
            Err(e) => {
                warn!(
                    subsystem = "db",
                    component = "ingest",
                    op = "rollback",
                    asin = %book.asin,
                    error = %e,
                    "Highlight insert failed; rolling back book"
                );
                tx.rollback().await.map_err(Error::Database)?;
                return Err(e);
            }
        };
        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "ingest",
            op = "commit",
            asin = %book.asin,
            user_id = %user_id,
            highlight_count = written,
            duration_ms = start.elapsed().as_millis() as u64,
            "Book and highlights committed"
        );
        log_pool_metrics(&self.pool);
        Ok(written)
    }
}
