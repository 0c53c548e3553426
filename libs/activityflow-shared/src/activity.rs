use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ActivityStatus;

/// Activity as returned by the API, with its relations resolved to names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDto {
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
    pub status: ActivityStatus,

    pub category_id: Option<i64>,
    pub category_name: Option<String>,

    pub created_by_user_id: Uuid,
    pub created_by_user_name: String,

    pub assigned_to_user_id: Option<Uuid>,
    pub assigned_to_user_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateActivityDto {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: i32,
    /// Falls back to the `Pending` status when absent.
    pub status_id: Option<i64>,
    pub category_id: Option<i64>,
    pub assigned_to_user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateActivityDto {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    /// Status name, e.g. `"InProgress"`.
    #[serde(default = "default_status_name")]
    pub status: String,
    pub priority: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to_user_id: Option<Uuid>,
}

fn default_status_name() -> String {
    ActivityStatus::Pending.to_string()
}

impl Default for UpdateActivityDto {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            category_id: None,
            status: default_status_name(),
            priority: None,
            due_date: None,
            assigned_to_user_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_defaults_status_to_pending() {
        let dto: UpdateActivityDto = serde_json::from_str(r#"{"title":"t","category_id":2}"#).unwrap();
        assert_eq!(dto.status, "Pending");
        assert_eq!(dto.category_id, Some(2));
        assert!(dto.priority.is_none());
    }

    #[test]
    fn create_accepts_minimal_body() {
        let dto: CreateActivityDto = serde_json::from_str(r#"{"title":"write report"}"#).unwrap();
        assert_eq!(dto.priority, 0);
        assert!(dto.status_id.is_none());
        assert!(dto.assigned_to_user_id.is_none());
    }
}
