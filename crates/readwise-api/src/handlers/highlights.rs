//! Kindle extract upload and book retrieval.

use axum::{
    extract::{multipart::{MultipartError, MultipartRejection}, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

use readwise_core::Book;

use crate::error::ApiError;
use crate::services::IngestOutcome;
use crate::AppState;

/// Name of the multipart field carrying the extract document.
pub const FILE_FIELD: &str = "file";

/// Upload a Kindle highlights extract for a user.
///
/// # Multipart Fields
/// - `file`: JSON extract document (required). Other fields are ignored.
///
/// # Returns
/// - 200 OK with the stored book id and highlight count
/// - 400 Bad Request if the body is not multipart, `file` is missing, or the
///   document is malformed
/// - 409 Conflict if the book was already uploaded
/// - 413 Payload Too Large if the upload exceeds the configured limit
/// - 500 / 503 on storage failure or timeout
pub async fn parse_kindle_file(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<IngestOutcome>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        warn!(
            subsystem = "api",
            component = "upload",
            op = "multipart",
            user_id = %user_id,
            error = %rejection.body_text(),
            "Upload is not multipart"
        );
        ApiError::BadRequest(format!("Error parsing file: {}", rejection.body_text()))
    })?;

    let mut file_data = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(FILE_FIELD) {
            file_data = Some(field.bytes().await.map_err(multipart_error)?);
        }
    }

    let bytes = file_data.ok_or_else(|| {
        ApiError::BadRequest(format!(
            "Error parsing file: missing multipart field '{}'",
            FILE_FIELD
        ))
    })?;

    let outcome = state.ingestion.ingest_upload(&user_id, &bytes).await?;
    Ok(Json(outcome))
}

/// Fetch the user's most recent book with its highlights.
pub async fn get_user_book(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let book = state.ingestion.book_for_user(&user_id).await?;
    Ok(Json(book))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(format!("Error parsing file: {}", err.body_text()))
    }
}
