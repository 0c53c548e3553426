use activityflow_shared::user::{
    ChangePasswordRequest, CreateUserRequest, LockUserRequest, ROLE_ADMIN, ResetPasswordRequest, UpdateUserRequest,
    UserDto,
};
use axum::{extract::State, response::Response};
use uuid::Uuid;

use super::auth_outcome;
use super::extract::{Json, Path};
use crate::AppState;
use crate::auth::AuthUser;
use crate::error::AppResult;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<UserDto>>> {
    Ok(Json(state.user_service.get_all().await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<UserDto>> {
    Ok(Json(state.user_service.get_by_id(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<Response> {
    user.require_role(ROLE_ADMIN)?;
    Ok(auth_outcome(state.user_service.create(&req).await?))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<Response> {
    user.require_role(ROLE_ADMIN)?;
    Ok(auth_outcome(state.user_service.update(&req).await?))
}

pub async fn delete(State(state): State<AppState>, user: AuthUser, Path(id): Path<Uuid>) -> AppResult<Response> {
    user.require_role(ROLE_ADMIN)?;
    Ok(auth_outcome(state.user_service.delete(id).await?))
}

pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<Response> {
    Ok(auth_outcome(state.user_service.change_password(&user, &req).await?))
}

pub async fn reset_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<Response> {
    user.require_role(ROLE_ADMIN)?;
    Ok(auth_outcome(state.user_service.reset_password(&req).await?))
}

pub async fn lock(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<LockUserRequest>,
) -> AppResult<Response> {
    user.require_role(ROLE_ADMIN)?;
    Ok(auth_outcome(state.user_service.lock(id, req.lockout_end).await?))
}

pub async fn unlock(State(state): State<AppState>, user: AuthUser, Path(id): Path<Uuid>) -> AppResult<Response> {
    user.require_role(ROLE_ADMIN)?;
    Ok(auth_outcome(state.user_service.unlock(id).await?))
}
