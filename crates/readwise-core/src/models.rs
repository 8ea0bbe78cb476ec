//! Domain models: persisted books and highlights, and the transient raw
//! extract decoded from an upload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// RAW EXTRACT (upload format)
// =============================================================================

/// Decode `null` as the field type's default, the way a missing field is.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One uploaded Kindle extract: a single book and its highlights.
///
/// Field names follow the exporter's JSON verbatim. Missing or `null` fields
/// decode to their empty values; [`RawExtractBook::validate`](crate::extract)
/// decides whether the result is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawExtractBook {
    #[serde(deserialize_with = "null_as_default")]
    pub asin: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub authors: String,
    #[serde(deserialize_with = "null_as_default")]
    pub highlights: Vec<RawHighlight>,
}

/// A single highlight or standalone note as exported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawHighlight {
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(rename = "isNoteOnly", deserialize_with = "null_as_default")]
    pub is_note_only: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub location: RawLocation,
    #[serde(deserialize_with = "null_as_default")]
    pub note: String,
}

/// Where in the book a highlight was taken.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLocation {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: i64,
}

// =============================================================================
// PERSISTED ENTITIES
// =============================================================================

/// A book owned by one user. `id` is the catalog identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub asin: String,
    pub title: String,
    pub authors: String,
    pub user_id: String,
    /// Populated when a book is read back; empty on insert.
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Map a parsed extract to the book row it produces.
    ///
    /// The catalog identifier doubles as the primary key, so uploading the
    /// same book twice conflicts instead of updating.
    pub fn from_extract(extract: &RawExtractBook, user_id: &str, now: DateTime<Utc>) -> Self {
        let asin = extract.asin.trim().to_string();
        Self {
            id: asin.clone(),
            asin,
            title: extract.title.trim().to_string(),
            authors: extract.authors.trim().to_string(),
            user_id: user_id.to_string(),
            highlights: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A quoted excerpt or standalone note stored against a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub id: Uuid,
    pub book_id: String,
    pub text: String,
    pub location: i64,
    pub location_url: Option<String>,
    pub note: Option<String>,
    pub is_note_only: bool,
    /// Index within the uploaded extract.
    pub position: i32,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Highlight {
    /// Build the row for the `position`-th raw highlight of an extract.
    pub fn from_raw(
        raw: &RawHighlight,
        book_id: &str,
        user_id: &str,
        position: i32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            book_id: book_id.to_string(),
            text: raw.text.clone(),
            location: raw.location.value,
            location_url: non_empty(&raw.location.url),
            note: non_empty(&raw.note),
            is_note_only: raw.is_note_only,
            position,
            user_id: user_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl RawExtractBook {
    /// Highlight rows for this extract, in upload order, attached to the
    /// book identified by the extract's catalog identifier.
    pub fn highlight_rows(&self, user_id: &str, now: DateTime<Utc>) -> Vec<Highlight> {
        let book_id = self.asin.trim();
        self.highlights
            .iter()
            .enumerate()
            .map(|(i, raw)| Highlight::from_raw(raw, book_id, user_id, i as i32, now))
            .collect()
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
