pub mod db;
pub mod models;
pub mod repositories;
pub mod seed;

pub use db::{init_db, migrate};
pub use seed::seed;
pub use sqlx;

/// Postgres SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE for `foreign_key_violation`.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Walks an `anyhow` chain looking for a database error with the given SQLSTATE.
pub fn has_db_code(err: &anyhow::Error, code: &str) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
            .and_then(|db| db.code())
            .is_some_and(|c| c == code)
    })
}

/// Name of the constraint behind the first database error in an `anyhow` chain.
pub fn db_constraint(err: &anyhow::Error) -> Option<&str> {
    err.chain().find_map(|cause| {
        cause
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
            .and_then(|db| db.constraint())
    })
}
