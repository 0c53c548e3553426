use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::activity::{ActivityView, NewActivity};

/// Foreign key from `activities.user_id` to the owning user.
pub const OWNER_FK: &str = "fk_activities_owner";

const VIEW_SELECT: &str = r#"
    SELECT a.id, a.title, a.description, a.created_at, a.start_date, a.end_date,
           a.due_date, a.completed_at, a.priority,
           a.status_id, s.name AS status_name,
           a.category_id, c.name AS category_name,
           a.user_id, u.user_name AS user_name,
           a.assigned_to_id, au.user_name AS assigned_to_name
    FROM activities a
    JOIN statuses s ON s.id = a.status_id
    JOIN users u ON u.id = a.user_id
    LEFT JOIN categories c ON c.id = a.category_id
    LEFT JOIN users au ON au.id = a.assigned_to_id
"#;

/// Column values written by an update.
#[derive(Debug, Clone)]
pub struct ActivityChanges {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub status_id: i64,
    pub priority: i32,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub assigned_to_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> Result<Vec<ActivityView>> {
        let sql = format!("{VIEW_SELECT} ORDER BY a.created_at DESC, a.id DESC");
        sqlx::query_as::<_, ActivityView>(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch activities")
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<ActivityView>> {
        let sql = format!("{VIEW_SELECT} WHERE a.id = $1");
        sqlx::query_as::<_, ActivityView>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch activity by ID")
    }

    pub async fn get_by_user(&self, user_id: Uuid) -> Result<Vec<ActivityView>> {
        let sql = format!("{VIEW_SELECT} WHERE a.user_id = $1 ORDER BY a.created_at DESC, a.id DESC");
        sqlx::query_as::<_, ActivityView>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch activities by user")
    }

    pub async fn get_by_category(&self, category_id: i64) -> Result<Vec<ActivityView>> {
        let sql = format!("{VIEW_SELECT} WHERE a.category_id = $1 ORDER BY a.created_at DESC, a.id DESC");
        sqlx::query_as::<_, ActivityView>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch activities by category")
    }

    /// Owner and assignee of an activity, used for authorization checks.
    pub async fn owner_of(&self, id: i64) -> Result<Option<(Uuid, Option<Uuid>)>> {
        sqlx::query_as::<_, (Uuid, Option<Uuid>)>(
            "SELECT user_id, assigned_to_id FROM activities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch activity owner")
    }

    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM activities")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count activities")
    }

    pub async fn create(&self, activity: &NewActivity) -> Result<i64> {
        sqlx::query_scalar(
            r#"
            INSERT INTO activities
                (title, description, start_date, end_date, due_date, priority,
                 status_id, category_id, user_id, assigned_to_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&activity.title)
        .bind(&activity.description)
        .bind(activity.start_date)
        .bind(activity.end_date)
        .bind(activity.due_date)
        .bind(activity.priority)
        .bind(activity.status_id)
        .bind(activity.category_id)
        .bind(activity.user_id)
        .bind(activity.assigned_to_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert activity")
    }

    pub async fn update(&self, id: i64, changes: &ActivityChanges) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE activities
            SET title = $1, description = $2, category_id = $3, status_id = $4,
                priority = $5, due_date = $6, completed_at = $7, assigned_to_id = $8
            WHERE id = $9
            "#,
        )
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.category_id)
        .bind(changes.status_id)
        .bind(changes.priority)
        .bind(changes.due_date)
        .bind(changes.completed_at)
        .bind(changes.assigned_to_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update activity")?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete activity")?;
        Ok(result.rows_affected() > 0)
    }
}
