//! Service layer for business logic.

pub mod ingestion;

pub use ingestion::{DailyInsights, IngestOutcome, IngestionService};
