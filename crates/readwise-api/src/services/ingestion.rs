//! Upload ingestion: parse, validate and persist a Kindle extract.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use readwise_core::{parse_extract, validate_user_id, Book, Error, Result, Storage};

pub const SAVED_MESSAGE: &str = "Highlights saved successfully";

/// Confirmation returned for a successful upload.
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub message: String,
    pub book_id: String,
    pub highlights_saved: usize,
}

/// Placeholder payload for the daily insights endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DailyInsights {
    pub status: String,
    pub message: String,
}

/// Turns uploaded extract files into stored books.
///
/// Holds no per-request state; clones share the same storage handle.
#[derive(Clone)]
pub struct IngestionService {
    storage: Arc<dyn Storage>,
    storage_timeout: Duration,
}

impl IngestionService {
    pub fn new(storage: Arc<dyn Storage>, storage_timeout: Duration) -> Self {
        Self {
            storage,
            storage_timeout,
        }
    }

    /// Parse `bytes` as an extract and persist it for `user_id`.
    ///
    /// Nothing touches storage unless the user id, the document and every
    /// highlight pass validation.
    pub async fn ingest_upload(&self, user_id: &str, bytes: &[u8]) -> Result<IngestOutcome> {
        let start = Instant::now();
        validate_user_id(user_id)?;

        let extract = parse_extract(bytes).inspect_err(|e| {
            warn!(
                subsystem = "api",
                component = "ingest",
                op = "parse",
                user_id = %user_id,
                error = %e,
                "Rejected malformed upload"
            );
        })?;
        extract.validate().inspect_err(|e| {
            warn!(
                subsystem = "api",
                component = "ingest",
                op = "validate",
                user_id = %user_id,
                asin = %extract.asin,
                error = %e,
                "Rejected invalid extract"
            );
        })?;

        let book = Book::from_extract(&extract, user_id, Utc::now());
        debug!(
            subsystem = "api",
            component = "ingest",
            asin = %book.asin,
            highlight_count = extract.highlights.len(),
            "Persisting extract"
        );

        let saved = self
            .with_deadline(
                "ingest_extract",
                self.storage.ingest_extract(&book, &extract, user_id),
            )
            .await?;

        info!(
            subsystem = "api",
            component = "ingest",
            op = "upload",
            user_id = %user_id,
            asin = %book.asin,
            highlight_count = saved,
            duration_ms = start.elapsed().as_millis() as u64,
            "Highlights saved"
        );

        Ok(IngestOutcome {
            message: SAVED_MESSAGE.to_string(),
            book_id: book.id,
            highlights_saved: saved,
        })
    }

    /// The user's most recent book with its highlights.
    pub async fn book_for_user(&self, user_id: &str) -> Result<Book> {
        validate_user_id(user_id)?;
        self.with_deadline("get_book", self.storage.get_book(user_id))
            .await
    }

    pub fn daily_insights(&self) -> DailyInsights {
        DailyInsights {
            status: "ok".to_string(),
            message: "Daily insights are not available yet".to_string(),
        }
    }

    async fn with_deadline<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.storage_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(format!(
                "{} did not finish within {}ms",
                op,
                self.storage_timeout.as_millis()
            ))),
        }
    }
}
