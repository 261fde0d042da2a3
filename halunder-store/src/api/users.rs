//! Operator list endpoint

use axum::{extract::State, Json};
use halunder_common::models::UsersResponse;

use crate::{api::ApiResult, db, AppState};

/// GET /api/users
pub async fn get_users(State(state): State<AppState>) -> ApiResult<Json<UsersResponse>> {
    let users = db::users::list_users(&state.db).await?;
    Ok(Json(UsersResponse { users }))
}
