//! Kindle extract parser.
//!
//! Decodes the JSON document produced by the Kindle highlights exporter
//! into a [`RawExtractBook`] and checks the business rules the exporter
//! itself does not enforce.

use tracing::debug;

use crate::defaults::{MAX_ASIN_LEN, MAX_USER_ID_LEN};
use crate::error::{Error, Result};
use crate::models::RawExtractBook;

/// Decode an uploaded extract.
///
/// Any decode failure (empty input, truncated or invalid JSON, wrong field
/// types) is reported as [`Error::MalformedInput`]. No business rules are
/// checked here; see [`RawExtractBook::validate`].
pub fn parse_extract(bytes: &[u8]) -> Result<RawExtractBook> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::MalformedInput("uploaded file is empty".to_string()));
    }

    let extract: RawExtractBook = serde_json::from_slice(bytes)?;

    debug!(
        subsystem = "core",
        component = "extract",
        op = "parse",
        asin = %extract.asin,
        highlight_count = extract.highlights.len(),
        "Decoded Kindle extract"
    );
    Ok(extract)
}

impl RawExtractBook {
    /// Check that the extract can be stored.
    ///
    /// Rules:
    /// - `asin` is non-blank and at most [`MAX_ASIN_LEN`] characters
    /// - `title` is non-blank
    /// - every highlight has text, or is a note-only entry with a note
    /// - no string field contains a NUL character (PostgreSQL TEXT rejects it)
    ///
    /// An extract without highlights is valid.
    pub fn validate(&self) -> Result<()> {
        reject_nul("asin", &self.asin)?;
        reject_nul("title", &self.title)?;
        reject_nul("authors", &self.authors)?;
        let asin = self.asin.trim();
        if asin.is_empty() {
            return Err(Error::MalformedInput("asin must not be empty".to_string()));
        }
        if asin.chars().count() > MAX_ASIN_LEN {
            return Err(Error::MalformedInput(format!(
                "asin must be {} characters or less",
                MAX_ASIN_LEN
            )));
        }
        if self.title.trim().is_empty() {
            return Err(Error::MalformedInput("title must not be empty".to_string()));
        }

        for (i, highlight) in self.highlights.iter().enumerate() {
            reject_nul(&format!("highlight {} text", i), &highlight.text)?;
            reject_nul(&format!("highlight {} note", i), &highlight.note)?;
            reject_nul(&format!("highlight {} location url", i), &highlight.location.url)?;

            let has_text = !highlight.text.trim().is_empty();
            let has_note = !highlight.note.trim().is_empty();
            if !has_text && !(highlight.is_note_only && has_note) {
                return Err(Error::MalformedInput(format!(
                    "highlight {} has no text{}",
                    i,
                    if highlight.is_note_only {
                        " and no note"
                    } else {
                        ""
                    }
                )));
            }
        }

        Ok(())
    }
}

fn reject_nul(field: &str, value: &str) -> Result<()> {
    if value.contains('\0') {
        return Err(Error::MalformedInput(format!(
            "{} must not contain NUL characters",
            field
        )));
    }
    Ok(())
}

/// Validate a user identifier taken from the request path.
///
/// Rules:
/// - Length between 1 and [`MAX_USER_ID_LEN`] characters
/// - No whitespace or control characters
pub fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id.is_empty() {
        return Err(Error::InvalidInput("user id cannot be empty".to_string()));
    }
    if user_id.chars().count() > MAX_USER_ID_LEN {
        return Err(Error::InvalidInput(format!(
            "user id must be {} characters or less",
            MAX_USER_ID_LEN
        )));
    }
    if user_id
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(Error::InvalidInput(
            "user id must not contain whitespace or control characters".to_string(),
        ));
    }
    Ok(())
}
