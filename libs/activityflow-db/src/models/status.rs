use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Status {
    pub id: i64,
    pub name: String, // ActivityStatus variant name
    pub description: Option<String>,
    pub display_order: i32,
    pub color: String,
}
