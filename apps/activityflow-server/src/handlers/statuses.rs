use activityflow_shared::status::{CreateStatusDto, StatusDto, UpdateStatusDto};
use activityflow_shared::user::ROLE_ADMIN;
use axum::{extract::State, http::StatusCode, response::Response};

use super::created;
use super::extract::{Json, Path};
use crate::AppState;
use crate::auth::AuthUser;
use crate::error::AppResult;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<StatusDto>>> {
    Ok(Json(state.status_service.get_all().await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<StatusDto>> {
    Ok(Json(state.status_service.get_by_id(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(dto): Json<CreateStatusDto>,
) -> AppResult<Response> {
    user.require_role(ROLE_ADMIN)?;
    let status = state.status_service.create(&dto).await?;
    Ok(created(format!("/api/statuses/{}", status.id), status))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateStatusDto>,
) -> AppResult<Json<StatusDto>> {
    user.require_role(ROLE_ADMIN)?;
    Ok(Json(state.status_service.update(id, &dto).await?))
}

pub async fn delete(State(state): State<AppState>, user: AuthUser, Path(id): Path<i64>) -> AppResult<StatusCode> {
    user.require_role(ROLE_ADMIN)?;
    state.status_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
