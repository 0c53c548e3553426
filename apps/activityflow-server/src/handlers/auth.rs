use activityflow_shared::auth::{LoginRequest, RefreshTokenRequest, RegisterRequest, WhoAmI};
use axum::{extract::State, response::Response};

use super::auth_outcome;
use super::extract::Json;
use crate::AppState;
use crate::auth::AuthUser;
use crate::error::AppResult;

pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> AppResult<Response> {
    Ok(auth_outcome(state.auth_service.login(&req).await?))
}

pub async fn register(State(state): State<AppState>, Json(req): Json<RegisterRequest>) -> AppResult<Response> {
    Ok(auth_outcome(state.auth_service.register(&req).await?))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> AppResult<Response> {
    Ok(auth_outcome(state.auth_service.refresh(&req).await?))
}

pub async fn test_auth(user: AuthUser) -> Json<WhoAmI> {
    Json(WhoAmI {
        message: "You are authenticated".to_string(),
        user_id: user.0.sub.clone(),
        user_email: user.email().to_string(),
        roles: user.roles().to_vec(),
    })
}
