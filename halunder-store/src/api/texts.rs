//! Ingest endpoint for processing-engine output

use axum::{extract::State, http::StatusCode, Json};
use halunder_common::models::{IngestResponse, NewText};

use crate::{
    api::{ApiError, ApiResult},
    db, AppState,
};

/// POST /api/texts
///
/// Stores a source text with the sentence pairs the processing engine
/// extracted from it.
pub async fn create_text(
    State(state): State<AppState>,
    Json(text): Json<NewText>,
) -> ApiResult<(StatusCode, Json<IngestResponse>)> {
    if text.added_by.trim().is_empty() {
        return Err(ApiError::BadRequest("added_by is required".to_string()));
    }
    if text.content.trim().is_empty() {
        return Err(ApiError::BadRequest("content is empty".to_string()));
    }
    if let Some(bad) = text
        .sentences
        .iter()
        .filter_map(|s| s.match_confidence)
        .find(|c| !(0.0..=1.0).contains(c))
    {
        return Err(ApiError::BadRequest(format!(
            "match_confidence {} outside [0.0, 1.0]",
            bad
        )));
    }

    let (text_id, sentences_inserted) =
        db::texts::insert_text_with_sentences(&state.db, &text).await?;

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            text_id,
            sentences_inserted,
        }),
    ))
}
