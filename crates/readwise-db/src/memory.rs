//! In-memory [`Storage`] for tests.
//!
//! Enforces the same constraints as the relational schema (unique catalog
//! identifier, highlights must reference an existing book) and can be told
//! to fail at a given highlight to exercise error paths.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use readwise_db::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let storage: Arc<dyn readwise_core::Storage> = Arc::new(store.clone());
//! // ... drive the API ...
//! assert_eq!(store.book_count(), 1);
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use readwise_core::{Book, Error, Highlight, RawExtractBook, Result, Storage};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashSet<String>,
    books: Vec<Book>,
    highlights: Vec<Highlight>,
}

/// Shared in-memory store; clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_at_highlight: Arc<Mutex<Option<usize>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent highlight write fail when it reaches the
    /// highlight at `position` within an extract.
    pub fn fail_at_highlight(&self, position: usize) {
        if let Ok(mut slot) = self.fail_at_highlight.lock() {
            *slot = Some(position);
        }
    }

    /// Number of stored books.
    pub fn book_count(&self) -> usize {
        self.state.lock().map(|s| s.books.len()).unwrap_or(0)
    }

    /// Number of stored highlights across all books.
    pub fn highlight_count(&self) -> usize {
        self.state.lock().map(|s| s.highlights.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))
    }

    fn failure_position(&self) -> Option<usize> {
        self.fail_at_highlight.lock().ok().and_then(|slot| *slot)
    }

    fn injected_failure(position: usize) -> Error {
        Error::Internal(format!("injected failure at highlight {}", position))
    }
}

impl MemoryState {
    fn check_book_insert(&self, book: &Book) -> Result<()> {
        if self
            .books
            .iter()
            .any(|b| b.id == book.id || b.asin == book.asin)
        {
            return Err(Error::Conflict(format!(
                "Book {} already exists",
                book.asin
            )));
        }
        Ok(())
    }

    fn check_highlight_insert(&self, highlight: &Highlight) -> Result<()> {
        if !self.books.iter().any(|b| b.id == highlight.book_id) {
            return Err(Error::Internal(format!(
                "highlight references missing book {}",
                highlight.book_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn create_book(&self, book: &Book) -> Result<()> {
        let mut state = self.lock()?;
        state.check_book_insert(book)?;
        state.users.insert(book.user_id.clone());
        state.books.push(book.clone());
        Ok(())
    }

    async fn save_highlights(&self, extract: &RawExtractBook, user_id: &str) -> Result<usize> {
        let rows = extract.highlight_rows(user_id, Utc::now());
        let fail_at = self.failure_position();
        let mut state = self.lock()?;
        state.users.insert(user_id.to_string());
        for (i, row) in rows.into_iter().enumerate() {
            if fail_at == Some(i) {
                return Err(Self::injected_failure(i));
            }
            state.check_highlight_insert(&row)?;
            state.highlights.push(row);
        }
        Ok(extract.highlights.len())
    }

    async fn get_book(&self, user_id: &str) -> Result<Book> {
        let state = self.lock()?;
        let mut book = state
            .books
            .iter()
            .filter(|b| b.user_id == user_id)
            .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("No book found for user {}", user_id)))?;

        let mut highlights: Vec<Highlight> = state
            .highlights
            .iter()
            .filter(|h| h.book_id == book.id)
            .cloned()
            .collect();
        highlights.sort_by_key(|h| h.position);
        book.highlights = highlights;
        Ok(book)
    }

    /// All-or-nothing: every constraint is checked before anything is stored.
    async fn ingest_extract(
        &self,
        book: &Book,
        extract: &RawExtractBook,
        user_id: &str,
    ) -> Result<usize> {
        let rows = extract.highlight_rows(user_id, book.created_at);
        if let Some(position) = self.failure_position() {
            if position < rows.len() {
                return Err(Self::injected_failure(position));
            }
        }

        let mut state = self.lock()?;
        state.check_book_insert(book)?;
        if let Some(orphan) = rows.iter().find(|h| h.book_id != book.id) {
            return Err(Error::Internal(format!(
                "highlight references missing book {}",
                orphan.book_id
            )));
        }

        let written = rows.len();
        state.users.insert(user_id.to_string());
        state.books.push(book.clone());
        state.highlights.extend(rows);
        Ok(written)
    }
}
