pub mod activity;
pub mod category;
pub mod comment;
pub mod status;
pub mod user;
