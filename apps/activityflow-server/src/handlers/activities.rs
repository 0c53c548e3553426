use activityflow_shared::activity::{ActivityDto, CreateActivityDto, UpdateActivityDto};
use activityflow_shared::category::CategoryDto;
use axum::{extract::State, http::StatusCode, response::Response};
use uuid::Uuid;

use super::created;
use super::extract::{Json, Path};
use crate::AppState;
use crate::auth::AuthUser;
use crate::error::AppResult;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ActivityDto>>> {
    Ok(Json(state.activity_service.get_all().await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<ActivityDto>> {
    Ok(Json(state.activity_service.get_by_id(id).await?))
}

pub async fn by_user(State(state): State<AppState>, Path(user_id): Path<Uuid>) -> AppResult<Json<Vec<ActivityDto>>> {
    Ok(Json(state.activity_service.get_by_user(user_id).await?))
}

pub async fn by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> AppResult<Json<Vec<ActivityDto>>> {
    Ok(Json(state.activity_service.get_by_category(category_id).await?))
}

pub async fn categories(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryDto>>> {
    Ok(Json(state.activity_service.categories().await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(dto): Json<CreateActivityDto>,
) -> AppResult<Response> {
    let activity = state.activity_service.create(&user, &dto).await?;
    Ok(created(format!("/api/activities/{}", activity.id), activity))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateActivityDto>,
) -> AppResult<StatusCode> {
    state.activity_service.update(&user, id, &dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(State(state): State<AppState>, user: AuthUser, Path(id): Path<i64>) -> AppResult<StatusCode> {
    state.activity_service.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
