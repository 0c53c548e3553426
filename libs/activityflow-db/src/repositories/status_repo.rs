use activityflow_shared::ActivityStatus;
use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::models::status::Status;

#[derive(Debug, Clone)]
pub struct StatusRepository {
    pool: PgPool,
}

impl StatusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> Result<Vec<Status>> {
        sqlx::query_as::<_, Status>("SELECT * FROM statuses ORDER BY display_order ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch statuses")
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Status>> {
        sqlx::query_as::<_, Status>("SELECT * FROM statuses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch status by ID")
    }

    pub async fn get_by_name(&self, name: ActivityStatus) -> Result<Option<Status>> {
        sqlx::query_as::<_, Status>("SELECT * FROM statuses WHERE name = $1")
            .bind(name.as_str())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch status by name")
    }

    pub async fn create(
        &self,
        name: ActivityStatus,
        description: Option<&str>,
        display_order: i32,
        color: &str,
    ) -> Result<Status> {
        sqlx::query_as::<_, Status>(
            r#"
            INSERT INTO statuses (name, description, display_order, color)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name.as_str())
        .bind(description)
        .bind(display_order)
        .bind(color)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create status")
    }

    /// Inserts the status unless one with the same name exists.
    pub async fn ensure(&self, name: ActivityStatus, description: &str, display_order: i32, color: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO statuses (name, description, display_order, color)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name.as_str())
        .bind(description)
        .bind(display_order)
        .bind(color)
        .execute(&self.pool)
        .await
        .context("Failed to seed status")?;
        Ok(())
    }

    pub async fn update(
        &self,
        id: i64,
        description: Option<&str>,
        display_order: Option<i32>,
        color: Option<&str>,
    ) -> Result<Option<Status>> {
        sqlx::query_as::<_, Status>(
            r#"
            UPDATE statuses
            SET description = COALESCE($1, description),
                display_order = COALESCE($2, display_order),
                color = COALESCE($3, color)
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(description)
        .bind(display_order)
        .bind(color)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update status")
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM statuses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete status")?;
        Ok(result.rows_affected() > 0)
    }
}
