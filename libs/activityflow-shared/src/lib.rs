//! Wire types shared by the ActivityFlow server and its clients.

pub mod activity;
pub mod auth;
pub mod category;
pub mod comment;
pub mod status;
pub mod user;

use serde::{Deserialize, Serialize};

pub use status::ActivityStatus;

/// JSON body returned with every non-2xx response outside of `/api/auth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Vec::new(),
        }
    }
}
