use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{NewUser, User, UserWithRoles};

const USER_COLUMNS: &str = "u.id, u.email, u.user_name, u.password_hash, u.email_confirmed, \
     u.lockout_enabled, u.lockout_end, u.created_at";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> Result<Vec<UserWithRoles>> {
        let sql = format!(
            "SELECT {USER_COLUMNS}, \
                COALESCE(array_agg(ur.role::text ORDER BY ur.role) FILTER (WHERE ur.role IS NOT NULL), ARRAY[]::text[]) AS roles \
             FROM users u \
             LEFT JOIN user_roles ur ON ur.user_id = u.id \
             GROUP BY u.id \
             ORDER BY u.created_at ASC"
        );
        sqlx::query_as::<_, UserWithRoles>(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch all users")
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by ID")
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower($1)")
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by email")
    }

    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count users")
    }

    /// Inserts the user and its roles in one transaction.
    pub async fn create(&self, new_user: NewUser<'_>, roles: &[String]) -> Result<User> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, user_name, password_hash, email_confirmed)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_user.email.trim())
        .bind(new_user.user_name.trim())
        .bind(new_user.password_hash)
        .bind(new_user.email_confirmed)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert user")?;

        for role in roles {
            sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(user.id)
                .bind(role)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to assign role {role}"))?;
        }

        tx.commit().await.context("Failed to commit user creation")?;
        Ok(user)
    }

    /// Rewrites email and user name and replaces the role set in one
    /// transaction. `false` when the user does not exist.
    pub async fn update_account(&self, id: Uuid, email: &str, roles: &[String]) -> Result<bool> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let result = sqlx::query("UPDATE users SET email = $1, user_name = $1 WHERE id = $2")
            .bind(email.trim())
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to update user email")?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear user roles")?;

        for role in roles {
            sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(id)
                .bind(role)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to assign role {role}"))?;
        }

        tx.commit().await.context("Failed to commit account update")?;
        Ok(true)
    }

    pub async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update password hash")?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_lockout_end(&self, id: Uuid, lockout_end: Option<DateTime<Utc>>) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET lockout_end = $1 WHERE id = $2")
            .bind(lockout_end)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update lockout end")?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete user")?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_roles(&self, id: Uuid) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT role::text FROM user_roles WHERE user_id = $1 ORDER BY role")
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch user roles")
    }

    pub async fn add_role(&self, id: Uuid, role: &str) -> Result<()> {
        sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(id)
            .bind(role)
            .execute(&self.pool)
            .await
            .context("Failed to add user role")?;
        Ok(())
    }

    pub async fn role_exists(&self, role: &str) -> Result<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM roles WHERE name = $1)")
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check role")
    }

    pub async fn ensure_role(&self, role: &str) -> Result<()> {
        sqlx::query("INSERT INTO roles (name) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(role)
            .execute(&self.pool)
            .await
            .context("Failed to create role")?;
        Ok(())
    }
}
