pub mod activity_service;
pub mod auth_service;
pub mod category_service;
pub mod comment_service;
pub mod password;
pub mod status_service;
pub mod user_service;

use activityflow_db::{FOREIGN_KEY_VIOLATION, db_constraint, has_db_code};

use crate::error::AppError;

/// Maps a failed insert. A broken `caller_fk` means the token outlived its
/// user; any other foreign key points at a row removed since validation.
pub(crate) fn insert_failure(err: anyhow::Error, caller_fk: &str) -> AppError {
    if !has_db_code(&err, FOREIGN_KEY_VIOLATION) {
        return AppError::Internal(err);
    }
    if db_constraint(&err) == Some(caller_fk) {
        tracing::warn!("Rejected write from a deleted account: {:#}", err);
        AppError::Unauthorized
    } else {
        AppError::BadRequest("A referenced record no longer exists".to_string())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::borrow::Cow;
    use std::fmt;

    use anyhow::Context;
    use sqlx::error::{DatabaseError, ErrorKind};

    #[derive(Debug)]
    struct FakeDbError {
        code: &'static str,
        constraint: Option<&'static str>,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "database error {}", self.code)
        }
    }

    impl std::error::Error for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// A repository-style error wrapping a Postgres failure with `code`.
    pub(crate) fn db_error(code: &'static str, constraint: Option<&'static str>) -> anyhow::Error {
        let err: Result<(), sqlx::Error> = Err(sqlx::Error::Database(Box::new(FakeDbError { code, constraint })));
        err.context("Failed to insert row").unwrap_err()
    }
}
