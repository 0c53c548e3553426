use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::comment::Comment;

/// Foreign key from `comments.user_id` to the author.
pub const AUTHOR_FK: &str = "fk_comments_author";

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.content, c.user_id, u.user_name AS user_name, c.activity_id,
           c.created_at, c.updated_at
    FROM comments c
    JOIN users u ON u.id = c.user_id
"#;

#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_activity(&self, activity_id: i64) -> Result<Vec<Comment>> {
        let sql = format!("{COMMENT_SELECT} WHERE c.activity_id = $1 ORDER BY c.created_at ASC, c.id ASC");
        sqlx::query_as::<_, Comment>(&sql)
            .bind(activity_id)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch comments")
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let sql = format!("{COMMENT_SELECT} WHERE c.id = $1");
        sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch comment by ID")
    }

    pub async fn create(&self, activity_id: i64, user_id: Uuid, content: &str) -> Result<i64> {
        sqlx::query_scalar(
            "INSERT INTO comments (content, user_id, activity_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(content)
        .bind(user_id)
        .bind(activity_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create comment")
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete comment")?;
        Ok(result.rows_affected() > 0)
    }
}
