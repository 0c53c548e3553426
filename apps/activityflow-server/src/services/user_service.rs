use activityflow_db::models::user::{NewUser, User};
use activityflow_db::repositories::user_repo::UserRepository;
use activityflow_db::{FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION, has_db_code};
use activityflow_shared::auth::AuthResponse;
use activityflow_shared::user::{
    ChangePasswordRequest, CreateUserRequest, ROLE_USER, ResetPasswordRequest, UpdateUserRequest, UserDto,
};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::auth_service::{EMAIL_TAKEN, INCORRECT_PASSWORD, PASSWORDS_DO_NOT_MATCH, USER_NOT_FOUND};
use super::password::PasswordHasher;
use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::validation;

/// Lockout applied when an admin locks an account without an end date.
const INDEFINITE_LOCK_DAYS: i64 = 365 * 100;
const UNKNOWN_ROLES: &str = "Unknown roles";

pub fn to_dto(user: User, roles: Vec<String>) -> UserDto {
    UserDto {
        id: user.id,
        email: user.email,
        user_name: user.user_name,
        roles,
        email_confirmed: user.email_confirmed,
        lockout_enabled: user.lockout_enabled,
        lockout_end: user.lockout_end,
    }
}

/// Resolves the stored lockout end for a lock request.
pub fn lockout_end_for(requested: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    requested.unwrap_or(now + Duration::days(INDEFINITE_LOCK_DAYS))
}

/// Password change is allowed on one's own account, or on any account by an admin.
pub fn authorize_password_change(caller: &AuthUser, target: Uuid) -> AppResult<()> {
    if caller.id()? == target || caller.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("You can only change your own password".to_string()))
    }
}

/// Message for an account update that lost a race with another writer.
pub fn account_update_failure(err: &anyhow::Error) -> Option<&'static str> {
    if has_db_code(err, UNIQUE_VIOLATION) {
        Some(EMAIL_TAKEN)
    } else if has_db_code(err, FOREIGN_KEY_VIOLATION) {
        Some(UNKNOWN_ROLES)
    } else {
        None
    }
}

fn check_new_password(new_password: &str, confirm: &str) -> Option<String> {
    if new_password != confirm {
        return Some(PASSWORDS_DO_NOT_MATCH.to_string());
    }
    let problems = validation::password_violations(new_password);
    (!problems.is_empty()).then(|| problems.join(" "))
}

pub struct UserService {
    users: UserRepository,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(users: UserRepository, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    pub async fn get_all(&self) -> AppResult<Vec<UserDto>> {
        let users = self.users.get_all().await?;
        Ok(users.into_iter().map(|u| to_dto(u.user, u.roles)).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<UserDto> {
        let user = self
            .users
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;
        let roles = self.users.get_roles(id).await?;
        Ok(to_dto(user, roles))
    }

    /// Unknown role names, checked against the `roles` table.
    async fn unknown_roles(&self, roles: &[String]) -> AppResult<Vec<String>> {
        let mut unknown = Vec::new();
        for role in roles {
            if !self.users.role_exists(role).await? {
                unknown.push(role.clone());
            }
        }
        Ok(unknown)
    }

    pub async fn create(&self, req: &CreateUserRequest) -> AppResult<AuthResponse> {
        let problems = validation::validate_credentials(&req.email, &req.password);
        if !problems.is_empty() {
            return Ok(AuthResponse::failure(problems.join(" ")));
        }

        let email = req.email.trim();
        if self.users.get_by_email(email).await?.is_some() {
            return Ok(AuthResponse::failure(EMAIL_TAKEN));
        }

        let roles = if req.roles.is_empty() {
            vec![ROLE_USER.to_string()]
        } else {
            req.roles.clone()
        };
        let unknown = self.unknown_roles(&roles).await?;
        if !unknown.is_empty() {
            return Ok(AuthResponse::failure(format!("{UNKNOWN_ROLES}: {}", unknown.join(", "))));
        }

        let hash = self.hasher.hash(&req.password)?;
        let new_user = NewUser {
            email,
            user_name: email,
            password_hash: &hash,
            email_confirmed: true,
        };
        match self.users.create(new_user, &roles).await {
            Ok(user) => {
                tracing::info!("Admin created user {} with roles {:?}", user.email, roles);
                Ok(AuthResponse::ok("User created successfully"))
            }
            Err(e) if has_db_code(&e, UNIQUE_VIOLATION) => Ok(AuthResponse::failure(EMAIL_TAKEN)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn update(&self, req: &UpdateUserRequest) -> AppResult<AuthResponse> {
        if !validation::is_valid_email(&req.email) {
            return Ok(AuthResponse::failure("A valid email is required"));
        }
        if self.users.get_by_id(req.user_id).await?.is_none() {
            return Ok(AuthResponse::failure(USER_NOT_FOUND));
        }

        let email = req.email.trim();
        if let Some(existing) = self.users.get_by_email(email).await? {
            if existing.id != req.user_id {
                return Ok(AuthResponse::failure(EMAIL_TAKEN));
            }
        }

        let unknown = self.unknown_roles(&req.roles).await?;
        if !unknown.is_empty() {
            return Ok(AuthResponse::failure(format!("{UNKNOWN_ROLES}: {}", unknown.join(", "))));
        }

        match self.users.update_account(req.user_id, email, &req.roles).await {
            Ok(true) => {}
            Ok(false) => return Ok(AuthResponse::failure(USER_NOT_FOUND)),
            Err(e) => {
                return match account_update_failure(&e) {
                    Some(message) => Ok(AuthResponse::failure(message)),
                    None => Err(e.into()),
                };
            }
        }

        tracing::info!("Updated user {} (roles {:?})", req.user_id, req.roles);
        Ok(AuthResponse::ok("User updated successfully"))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<AuthResponse> {
        if !self.users.delete(id).await? {
            return Ok(AuthResponse::failure(USER_NOT_FOUND));
        }
        tracing::info!("Deleted user {}", id);
        Ok(AuthResponse::ok("User deleted successfully"))
    }

    pub async fn change_password(&self, caller: &AuthUser, req: &ChangePasswordRequest) -> AppResult<AuthResponse> {
        authorize_password_change(caller, req.user_id)?;
        if let Some(problem) = check_new_password(&req.new_password, &req.confirm_password) {
            return Ok(AuthResponse::failure(problem));
        }

        let Some(user) = self.users.get_by_id(req.user_id).await? else {
            return Ok(AuthResponse::failure(USER_NOT_FOUND));
        };
        if !self.hasher.verify(&req.current_password, &user.password_hash) {
            return Ok(AuthResponse::failure(INCORRECT_PASSWORD));
        }

        let hash = self.hasher.hash(&req.new_password)?;
        self.users.set_password_hash(user.id, &hash).await?;
        tracing::info!("Password changed for {}", user.email);
        Ok(AuthResponse::ok("Password changed successfully"))
    }

    pub async fn reset_password(&self, req: &ResetPasswordRequest) -> AppResult<AuthResponse> {
        if let Some(problem) = check_new_password(&req.new_password, &req.confirm_password) {
            return Ok(AuthResponse::failure(problem));
        }
        let Some(user) = self.users.get_by_email(req.email.trim()).await? else {
            return Ok(AuthResponse::failure(USER_NOT_FOUND));
        };

        let hash = self.hasher.hash(&req.new_password)?;
        self.users.set_password_hash(user.id, &hash).await?;
        tracing::info!("Password reset for {}", user.email);
        Ok(AuthResponse::ok("Password reset successfully"))
    }

    pub async fn lock(&self, id: Uuid, until: Option<DateTime<Utc>>) -> AppResult<AuthResponse> {
        let end = lockout_end_for(until, Utc::now());
        if !self.users.set_lockout_end(id, Some(end)).await? {
            return Ok(AuthResponse::failure(USER_NOT_FOUND));
        }
        tracing::info!("Locked user {} until {}", id, end);
        Ok(AuthResponse::ok("User locked successfully"))
    }

    pub async fn unlock(&self, id: Uuid) -> AppResult<AuthResponse> {
        if !self.users.set_lockout_end(id, None).await? {
            return Ok(AuthResponse::failure(USER_NOT_FOUND));
        }
        tracing::info!("Unlocked user {}", id);
        Ok(AuthResponse::ok("User unlocked successfully"))
    }
}

#[cfg(test)]
pub(crate) fn auth_user(id: Uuid, roles: &[&str]) -> AuthUser {
    use crate::auth::{Claims, TokenKind};
    AuthUser(Claims {
        sub: id.to_string(),
        email: "caller@example.com".into(),
        name: "caller@example.com".into(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        jti: Uuid::new_v4().to_string(),
        typ: TokenKind::Access,
        iss: "ActivityFlow".into(),
        aud: "ActivityFlowClient".into(),
        iat: 0,
        exp: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use activityflow_shared::user::ROLE_ADMIN;

    #[test]
    fn racing_account_updates_are_reported() {
        use crate::services::test_support::db_error;

        assert_eq!(account_update_failure(&db_error(UNIQUE_VIOLATION, None)), Some(EMAIL_TAKEN));
        assert_eq!(
            account_update_failure(&db_error(FOREIGN_KEY_VIOLATION, Some("user_roles_role_fkey"))),
            Some(UNKNOWN_ROLES)
        );
        assert_eq!(account_update_failure(&anyhow::anyhow!("connection reset")), None);
    }

    #[test]
    fn indefinite_lock_is_far_in_the_future() {
        let now = Utc::now();
        assert!(lockout_end_for(None, now) > now + Duration::days(365 * 50));
        let until = now + Duration::days(3);
        assert_eq!(lockout_end_for(Some(until), now), until);
    }

    #[test]
    fn password_change_is_limited_to_self_or_admin() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(authorize_password_change(&auth_user(me, &[ROLE_USER]), me).is_ok());
        assert!(matches!(
            authorize_password_change(&auth_user(me, &[ROLE_USER]), other),
            Err(AppError::Forbidden(_))
        ));
        assert!(authorize_password_change(&auth_user(me, &[ROLE_ADMIN]), other).is_ok());
    }

    #[test]
    fn new_password_checks() {
        assert_eq!(
            check_new_password("User123!", "User1234!").as_deref(),
            Some(PASSWORDS_DO_NOT_MATCH)
        );
        assert!(check_new_password("short", "short").is_some());
        assert!(check_new_password("User123!", "User123!").is_none());
    }
}
