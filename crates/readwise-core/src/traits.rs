//! Core traits for the readwise storage abstraction.
//!
//! The relational store and the in-memory store used in tests both
//! implement [`Storage`]; handlers only ever see `Arc<dyn Storage>`.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Book, RawExtractBook};

/// Persistence for books and their highlights.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Create the `users`, `books` and `highlights` tables if absent.
    ///
    /// Idempotent; called once at bootstrap.
    async fn ensure_schema(&self) -> Result<()>;

    /// Insert one book row, creating the owning user row if needed.
    ///
    /// Fails with `Error::Conflict` when the catalog identifier is taken.
    async fn create_book(&self, book: &Book) -> Result<()>;

    /// Insert one highlight row per raw highlight, attached to the book
    /// identified by the extract's catalog identifier.
    ///
    /// Stops at the first failing insert; earlier rows stay committed.
    /// Returns the number of rows written.
    async fn save_highlights(&self, extract: &RawExtractBook, user_id: &str) -> Result<usize>;

    /// Fetch the user's most recently created book with its highlights in
    /// upload order. Fails with `Error::NotFound` when the user has none.
    async fn get_book(&self, user_id: &str) -> Result<Book>;

    /// Persist a book and all of its highlights.
    ///
    /// Implementations that can should make this atomic: on any failure
    /// neither the book nor any highlight is left behind. This default runs
    /// the two steps independently.
    async fn ingest_extract(
        &self,
        book: &Book,
        extract: &RawExtractBook,
        user_id: &str,
    ) -> Result<usize> {
        self.create_book(book).await?;
        self.save_highlights(extract, user_id).await
    }
}
