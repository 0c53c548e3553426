use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    OnHold,
}

impl ActivityStatus {
    pub const ALL: [ActivityStatus; 5] = [
        ActivityStatus::Pending,
        ActivityStatus::InProgress,
        ActivityStatus::Completed,
        ActivityStatus::Cancelled,
        ActivityStatus::OnHold,
    ];

    /// Numeric code, stable across releases (1..=5).
    pub fn value(self) -> i32 {
        match self {
            ActivityStatus::Pending => 1,
            ActivityStatus::InProgress => 2,
            ActivityStatus::Completed => 3,
            ActivityStatus::Cancelled => 4,
            ActivityStatus::OnHold => 5,
        }
    }

    pub fn from_value(value: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.value() == value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityStatus::Pending => "Pending",
            ActivityStatus::InProgress => "InProgress",
            ActivityStatus::Completed => "Completed",
            ActivityStatus::Cancelled => "Cancelled",
            ActivityStatus::OnHold => "OnHold",
        }
    }

    /// Colour used when the status is seeded.
    pub fn default_color(self) -> &'static str {
        match self {
            ActivityStatus::Pending => "#9E9E9E",
            ActivityStatus::InProgress => "#2196F3",
            ActivityStatus::Completed => "#4CAF50",
            ActivityStatus::Cancelled => "#F44336",
            ActivityStatus::OnHold => "#FF9800",
        }
    }

    pub fn default_description(self) -> &'static str {
        match self {
            ActivityStatus::Pending => "Task is pending",
            ActivityStatus::InProgress => "Task is in progress",
            ActivityStatus::Completed => "Task is completed",
            ActivityStatus::Cancelled => "Task is cancelled",
            ActivityStatus::OnHold => "Task is on hold",
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown activity status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ActivityStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusDto {
    pub id: i64,
    pub name: ActivityStatus,
    pub description: Option<String>,
    pub order: i32,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStatusDto {
    pub name: ActivityStatus,
    pub description: Option<String>,
    #[serde(default)]
    pub order: i32,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStatusDto {
    pub description: Option<String>,
    pub order: Option<i32>,
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("inprogress".parse::<ActivityStatus>(), Ok(ActivityStatus::InProgress));
        assert_eq!(" OnHold ".parse::<ActivityStatus>(), Ok(ActivityStatus::OnHold));
        assert!("Done".parse::<ActivityStatus>().is_err());
    }

    #[test]
    fn numeric_codes_match_display_order() {
        let codes: Vec<i32> = ActivityStatus::ALL.iter().map(|s| s.value()).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5]);
        assert_eq!(ActivityStatus::from_value(3), Some(ActivityStatus::Completed));
        assert_eq!(ActivityStatus::from_value(0), None);
    }

    #[test]
    fn serializes_as_variant_name() {
        let json = serde_json::to_string(&ActivityStatus::InProgress).unwrap();
        assert_eq!(json, "\"InProgress\"");
    }
}
