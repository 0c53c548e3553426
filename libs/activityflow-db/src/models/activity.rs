use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Activity joined with the names of its status, category, owner and assignee.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityView {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub priority: i32,
    pub status_id: i64,
    pub status_name: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub user_id: Uuid,
    pub user_name: String,
    pub assigned_to_id: Option<Uuid>,
    pub assigned_to_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: i32,
    pub status_id: i64,
    pub category_id: Option<i64>,
    pub user_id: Uuid,
    pub assigned_to_id: Option<Uuid>,
}
