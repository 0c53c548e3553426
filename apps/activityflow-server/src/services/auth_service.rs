use std::sync::Arc;

use activityflow_db::models::user::{NewUser, User};
use activityflow_db::repositories::user_repo::UserRepository;
use activityflow_db::{UNIQUE_VIOLATION, has_db_code};
use activityflow_shared::auth::{AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest};
use activityflow_shared::user::ROLE_USER;
use chrono::Utc;
use uuid::Uuid;

use super::password::PasswordHasher;
use crate::auth::{JwtKeys, Subject, TokenKind};
use crate::error::AppResult;
use crate::validation;

pub const USER_NOT_FOUND: &str = "User not found";
pub const INCORRECT_PASSWORD: &str = "Incorrect password";
pub const ACCOUNT_LOCKED: &str = "Account is locked";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const EMAIL_TAKEN: &str = "User with this email already exists";
pub const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";

/// Login, registration and token refresh.
///
/// Business failures come back as `AuthResponse { success: false }`; only
/// infrastructure problems surface as errors.
pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtKeys>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(users: UserRepository, jwt: Arc<JwtKeys>, hasher: PasswordHasher) -> Self {
        Self { users, jwt, hasher }
    }

    pub async fn login(&self, req: &LoginRequest) -> AppResult<AuthResponse> {
        let Some(user) = self.users.get_by_email(req.email.trim()).await? else {
            tracing::info!("Login failed for {}: unknown email", req.email);
            return Ok(AuthResponse::failure(USER_NOT_FOUND));
        };

        if user.is_locked_out(Utc::now()) {
            tracing::warn!("Login refused for locked account {}", user.email);
            return Ok(AuthResponse::failure(ACCOUNT_LOCKED));
        }

        if !self.hasher.verify(&req.password, &user.password_hash) {
            tracing::info!("Login failed for {}: wrong password", user.email);
            return Ok(AuthResponse::failure(INCORRECT_PASSWORD));
        }

        self.token_response(&user, "Login successful").await
    }

    pub async fn register(&self, req: &RegisterRequest) -> AppResult<AuthResponse> {
        if let Some(problem) = check_registration(req) {
            return Ok(AuthResponse::failure(problem));
        }

        let email = req.email.trim();
        if self.users.get_by_email(email).await?.is_some() {
            return Ok(AuthResponse::failure(EMAIL_TAKEN));
        }

        let hash = self.hasher.hash(&req.password)?;
        let created = self
            .users
            .create(
                NewUser {
                    email,
                    user_name: email,
                    password_hash: &hash,
                    email_confirmed: false,
                },
                &[ROLE_USER.to_string()],
            )
            .await;

        let user = match created {
            Ok(user) => user,
            Err(e) if has_db_code(&e, UNIQUE_VIOLATION) => return Ok(AuthResponse::failure(EMAIL_TAKEN)),
            Err(e) => return Err(e.into()),
        };

        tracing::info!("Registered user {} ({})", user.email, user.id);
        self.token_response(&user, "Registration successful").await
    }

    pub async fn refresh(&self, req: &RefreshTokenRequest) -> AppResult<AuthResponse> {
        let Ok(claims) = self.jwt.verify(&req.refresh_token, TokenKind::Refresh) else {
            return Ok(AuthResponse::failure(INVALID_REFRESH_TOKEN));
        };
        let Ok(user_id) = Uuid::parse_str(&claims.sub) else {
            return Ok(AuthResponse::failure(INVALID_REFRESH_TOKEN));
        };

        let Some(user) = self.users.get_by_id(user_id).await? else {
            return Ok(AuthResponse::failure(USER_NOT_FOUND));
        };
        if user.is_locked_out(Utc::now()) {
            return Ok(AuthResponse::failure(ACCOUNT_LOCKED));
        }

        self.token_response(&user, "Token refreshed").await
    }

    async fn token_response(&self, user: &User, message: &str) -> AppResult<AuthResponse> {
        let roles = self.users.get_roles(user.id).await?;
        let pair = self.jwt.issue(&Subject {
            id: user.id,
            email: &user.email,
            name: &user.user_name,
            roles: &roles,
        })?;

        Ok(AuthResponse {
            token: pair.access,
            refresh_token: pair.refresh,
            expiration: Some(pair.expires_at),
            success: true,
            message: message.to_string(),
        })
    }
}

/// Checks a registration request without touching the database.
pub fn check_registration(req: &RegisterRequest) -> Option<String> {
    if req.password != req.confirm_password {
        return Some(PASSWORDS_DO_NOT_MATCH.to_string());
    }
    let problems = validation::validate_credentials(&req.email, &req.password);
    (!problems.is_empty()).then(|| problems.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn registration_requires_matching_passwords() {
        let problem = check_registration(&register("a@example.com", "User123!", "User123?"));
        assert_eq!(problem.as_deref(), Some(PASSWORDS_DO_NOT_MATCH));
    }

    #[test]
    fn registration_enforces_password_policy() {
        let problem = check_registration(&register("a@example.com", "weak", "weak")).unwrap();
        assert!(problem.contains("at least 6 characters"));
        assert!(problem.contains("uppercase"));
    }

    #[test]
    fn registration_rejects_bad_emails() {
        assert!(check_registration(&register("nope", "User123!", "User123!")).is_some());
        assert!(check_registration(&register("a@example.com", "User123!", "User123!")).is_none());
    }
}
