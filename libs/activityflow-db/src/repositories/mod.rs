pub mod activity_repo;
pub mod category_repo;
pub mod comment_repo;
pub mod status_repo;
pub mod user_repo;
