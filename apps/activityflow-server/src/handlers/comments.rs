use activityflow_shared::comment::{CommentDto, CreateCommentDto};
use axum::{extract::State, http::StatusCode, response::Response};

use super::created;
use super::extract::{Json, Path};
use crate::AppState;
use crate::auth::AuthUser;
use crate::error::AppResult;

pub async fn list(State(state): State<AppState>, Path(activity_id): Path<i64>) -> AppResult<Json<Vec<CommentDto>>> {
    Ok(Json(state.comment_service.list(activity_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(activity_id): Path<i64>,
    Json(dto): Json<CreateCommentDto>,
) -> AppResult<Response> {
    let comment = state.comment_service.create(&user, activity_id, &dto).await?;
    Ok(created(
        format!("/api/activities/{activity_id}/comments/{}", comment.id),
        comment,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((activity_id, comment_id)): Path<(i64, i64)>,
) -> AppResult<StatusCode> {
    state.comment_service.delete(&user, activity_id, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
