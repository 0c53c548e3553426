use std::sync::Arc;

use activityflow_db::repositories::{
    activity_repo::ActivityRepository, category_repo::CategoryRepository, comment_repo::CommentRepository,
    status_repo::StatusRepository, user_repo::UserRepository,
};
use sqlx::PgPool;

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::services::{
    activity_service::ActivityService, auth_service::AuthService, category_service::CategoryService,
    comment_service::CommentService, password::PasswordHasher, status_service::StatusService,
    user_service::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtKeys>,

    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub activity_service: Arc<ActivityService>,
    pub category_service: Arc<CategoryService>,
    pub status_service: Arc<StatusService>,
    pub comment_service: Arc<CommentService>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        let jwt = Arc::new(JwtKeys::new(&config.jwt));
        let hasher = PasswordHasher::new(config.bcrypt_cost);

        let users = UserRepository::new(pool.clone());
        let activities = ActivityRepository::new(pool.clone());
        let categories = CategoryRepository::new(pool.clone());
        let statuses = StatusRepository::new(pool.clone());
        let comments = CommentRepository::new(pool.clone());

        Self {
            auth_service: Arc::new(AuthService::new(users.clone(), jwt.clone(), hasher)),
            user_service: Arc::new(UserService::new(users.clone(), hasher)),
            activity_service: Arc::new(ActivityService::new(
                activities.clone(),
                statuses.clone(),
                categories.clone(),
                users,
            )),
            category_service: Arc::new(CategoryService::new(categories)),
            status_service: Arc::new(StatusService::new(statuses)),
            comment_service: Arc::new(CommentService::new(comments, activities)),
            jwt,
            config: Arc::new(config),
        }
    }
}
