use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Outcome of every auth and user-administration call.
///
/// Failures are reported with `success: false` and a human readable
/// `message`; token fields are empty in that case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub expiration: Option<DateTime<Utc>>,
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

impl AuthResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            ..Default::default()
        }
    }
}

/// Body of `GET /api/auth/test-auth`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoAmI {
    pub message: String,
    pub user_id: String,
    pub user_email: String,
    pub roles: Vec<String>,
}
