use activityflow_shared::category::{CategoryDto, CreateCategoryDto, UpdateCategoryDto};
use axum::{extract::State, http::StatusCode, response::Response};

use super::created;
use super::extract::{Json, Path};
use crate::AppState;
use crate::error::AppResult;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryDto>>> {
    Ok(Json(state.category_service.get_all().await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<CategoryDto>> {
    Ok(Json(state.category_service.get_by_id(id).await?))
}

pub async fn create(State(state): State<AppState>, Json(dto): Json<CreateCategoryDto>) -> AppResult<Response> {
    let category = state.category_service.create(&dto).await?;
    Ok(created(format!("/api/categories/{}", category.id), category))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateCategoryDto>,
) -> AppResult<Json<CategoryDto>> {
    Ok(Json(state.category_service.update(id, &dto).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    state.category_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
