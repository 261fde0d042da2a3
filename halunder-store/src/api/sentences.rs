//! Sentence-pair endpoints: full listing, partial update, delete

use axum::{
    extract::{Path, State},
    Json,
};
use halunder_common::{
    models::{SentencesResponse, UpdateResponse},
    SentencePatch,
};
use serde_json::{json, Value};
use tracing::info;

use crate::{
    api::{ApiError, ApiResult},
    db, AppState,
};

/// GET /api/all-sentences
///
/// The whole corpus in one response; the workbench paginates client-side.
pub async fn get_all_sentences(
    State(state): State<AppState>,
) -> ApiResult<Json<SentencesResponse>> {
    let sentences = db::sentences::list_with_metadata(&state.db).await?;
    Ok(Json(SentencesResponse { sentences }))
}

/// PUT /api/sentences/:id
///
/// Accepts any subset of `halunder_text`, `german_text`, `match_confidence`
/// and `reasoning`; other keys are ignored.
pub async fn update_sentence(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<SentencePatch>,
) -> ApiResult<Json<UpdateResponse>> {
    patch.validate()?;

    let updated = db::sentences::update(&state.db, &id, &patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("sentence {}", id)))?;

    info!(id = %id, "Updated sentence");

    Ok(Json(UpdateResponse {
        success: true,
        updated: Some(updated),
    }))
}

/// DELETE /api/sentences/:id
pub async fn delete_sentence(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if !db::sentences::delete(&state.db, &id).await? {
        return Err(ApiError::NotFound(format!("sentence {}", id)));
    }

    info!(id = %id, "Deleted sentence");
    Ok(Json(json!({ "success": true })))
}
