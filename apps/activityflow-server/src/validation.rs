//! Request validation. Every check collects all failing rules so the client
//! gets the full list in one round trip.

use activityflow_shared::activity::{CreateActivityDto, UpdateActivityDto};
use activityflow_shared::category::{CreateCategoryDto, UpdateCategoryDto};
use activityflow_shared::status::{CreateStatusDto, UpdateStatusDto};
use chrono::{DateTime, Utc};

use crate::error::AppError;

pub const TITLE_MAX: usize = 200;
pub const ACTIVITY_DESCRIPTION_MAX: usize = 1000;
pub const CATEGORY_NAME_MAX: usize = 100;
pub const CATEGORY_DESCRIPTION_MAX: usize = 500;
pub const STATUS_DESCRIPTION_MAX: usize = 100;
pub const COMMENT_MAX: usize = 1000;
pub const EMAIL_MAX: usize = 256;
pub const PASSWORD_MIN: usize = 6;
pub const PRIORITY_RANGE: std::ops::RangeInclusive<i32> = 0..=5;

#[derive(Debug, Default)]
struct Errors(Vec<String>);

impl Errors {
    fn check(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.0.push(message.into());
        }
    }

    fn finish(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.0))
        }
    }
}

fn len(s: &str) -> usize {
    s.chars().count()
}

fn optional_len(s: Option<&str>) -> usize {
    s.map(len).unwrap_or(0)
}

pub fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn check_activity_fields(
    errors: &mut Errors,
    title: &str,
    description: Option<&str>,
    due_date: Option<DateTime<Utc>>,
    priority: Option<i32>,
    now: DateTime<Utc>,
) {
    errors.check(!title.trim().is_empty(), "Title is required");
    errors.check(
        len(title) <= TITLE_MAX,
        format!("Title cannot exceed {TITLE_MAX} characters"),
    );
    errors.check(
        optional_len(description) <= ACTIVITY_DESCRIPTION_MAX,
        format!("Description cannot exceed {ACTIVITY_DESCRIPTION_MAX} characters"),
    );
    if let Some(due) = due_date {
        errors.check(due > now, "Due date must be in the future");
    }
    if let Some(priority) = priority {
        errors.check(
            PRIORITY_RANGE.contains(&priority),
            "Priority must be between 0 and 5",
        );
    }
}

pub fn validate_create_activity(dto: &CreateActivityDto, now: DateTime<Utc>) -> Result<(), AppError> {
    let mut errors = Errors::default();
    check_activity_fields(
        &mut errors,
        &dto.title,
        dto.description.as_deref(),
        dto.due_date,
        Some(dto.priority),
        now,
    );
    errors.finish()
}

pub fn validate_update_activity(dto: &UpdateActivityDto, now: DateTime<Utc>) -> Result<(), AppError> {
    let mut errors = Errors::default();
    check_activity_fields(
        &mut errors,
        &dto.title,
        dto.description.as_deref(),
        dto.due_date,
        dto.priority,
        now,
    );
    errors.check(!dto.status.trim().is_empty(), "Status is required");
    errors.finish()
}

fn check_category_fields(
    errors: &mut Errors,
    name: Option<&str>,
    description: Option<&str>,
    color: Option<&str>,
) {
    if let Some(name) = name {
        errors.check(!name.trim().is_empty(), "Name is required");
        errors.check(
            len(name) <= CATEGORY_NAME_MAX,
            format!("Name cannot exceed {CATEGORY_NAME_MAX} characters"),
        );
    }
    errors.check(
        optional_len(description) <= CATEGORY_DESCRIPTION_MAX,
        format!("Description cannot exceed {CATEGORY_DESCRIPTION_MAX} characters"),
    );
    if let Some(color) = color {
        errors.check(is_hex_color(color), "Color must be in #RRGGBB format");
    }
}

pub fn validate_create_category(dto: &CreateCategoryDto) -> Result<(), AppError> {
    let mut errors = Errors::default();
    check_category_fields(
        &mut errors,
        Some(&dto.name),
        dto.description.as_deref(),
        Some(&dto.color),
    );
    errors.finish()
}

pub fn validate_update_category(dto: &UpdateCategoryDto) -> Result<(), AppError> {
    let mut errors = Errors::default();
    check_category_fields(
        &mut errors,
        dto.name.as_deref(),
        dto.description.as_deref(),
        dto.color.as_deref(),
    );
    errors.finish()
}

fn check_status_fields(errors: &mut Errors, description: Option<&str>, order: Option<i32>, color: Option<&str>) {
    errors.check(
        optional_len(description) <= STATUS_DESCRIPTION_MAX,
        format!("Description cannot exceed {STATUS_DESCRIPTION_MAX} characters"),
    );
    if let Some(order) = order {
        errors.check(order >= 0, "Order must be a non-negative number");
    }
    if let Some(color) = color {
        errors.check(is_hex_color(color), "Color must be in #RRGGBB format");
    }
}

pub fn validate_create_status(dto: &CreateStatusDto) -> Result<(), AppError> {
    let mut errors = Errors::default();
    check_status_fields(
        &mut errors,
        dto.description.as_deref(),
        Some(dto.order),
        dto.color.as_deref(),
    );
    errors.finish()
}

pub fn validate_update_status(dto: &UpdateStatusDto) -> Result<(), AppError> {
    let mut errors = Errors::default();
    check_status_fields(
        &mut errors,
        dto.description.as_deref(),
        dto.order,
        dto.color.as_deref(),
    );
    errors.finish()
}

pub fn validate_comment(content: &str) -> Result<(), AppError> {
    let mut errors = Errors::default();
    errors.check(!content.trim().is_empty(), "Content is required");
    errors.check(
        len(content) <= COMMENT_MAX,
        format!("Content cannot exceed {COMMENT_MAX} characters"),
    );
    errors.finish()
}

/// Loose structural check: one `@` with a dotted domain and no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || len(email) > EMAIL_MAX || email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Failing password rules, empty when the password is acceptable.
pub fn password_violations(password: &str) -> Vec<String> {
    let mut errors = Errors::default();
    errors.check(
        len(password) >= PASSWORD_MIN,
        format!("Passwords must be at least {PASSWORD_MIN} characters."),
    );
    errors.check(
        password.chars().any(|c| c.is_ascii_digit()),
        "Passwords must have at least one digit ('0'-'9').",
    );
    errors.check(
        password.chars().any(char::is_lowercase),
        "Passwords must have at least one lowercase ('a'-'z').",
    );
    errors.check(
        password.chars().any(char::is_uppercase),
        "Passwords must have at least one uppercase ('A'-'Z').",
    );
    errors.check(
        password.chars().any(|c| !c.is_alphanumeric()),
        "Passwords must have at least one non alphanumeric character.",
    );
    errors.0
}

/// Email and password checks shared by registration and admin user creation.
pub fn validate_credentials(email: &str, password: &str) -> Vec<String> {
    let mut problems = Vec::new();
    if !is_valid_email(email) {
        problems.push("A valid email is required".to_string());
    }
    problems.extend(password_violations(password));
    problems
}
