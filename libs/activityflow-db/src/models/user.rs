use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub user_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email_confirmed: bool,
    pub lockout_enabled: bool,
    pub lockout_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_locked_out(&self, now: DateTime<Utc>) -> bool {
        self.lockout_enabled && self.lockout_end.is_some_and(|end| end > now)
    }
}

/// A user row joined with its role names.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithRoles {
    #[sqlx(flatten)]
    pub user: User,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub user_name: &'a str,
    pub password_hash: &'a str,
    pub email_confirmed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(lockout_enabled: bool, lockout_end: Option<DateTime<Utc>>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "a@example.com".into(),
            user_name: "a@example.com".into(),
            password_hash: String::new(),
            email_confirmed: true,
            lockout_enabled,
            lockout_end,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn lockout_requires_future_end() {
        let now = Utc::now();
        assert!(user(true, Some(now + Duration::hours(1))).is_locked_out(now));
        assert!(!user(true, Some(now - Duration::hours(1))).is_locked_out(now));
        assert!(!user(true, None).is_locked_out(now));
        assert!(!user(false, Some(now + Duration::hours(1))).is_locked_out(now));
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let json = serde_json::to_string(&user(true, None)).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(json.contains("lockout_enabled"));
    }
}
