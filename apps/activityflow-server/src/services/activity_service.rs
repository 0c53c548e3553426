use activityflow_db::models::activity::{ActivityView, NewActivity};
use activityflow_db::repositories::activity_repo::{ActivityChanges, ActivityRepository, OWNER_FK};
use activityflow_db::repositories::category_repo::CategoryRepository;
use activityflow_db::repositories::status_repo::StatusRepository;
use activityflow_db::repositories::user_repo::UserRepository;
use activityflow_shared::ActivityStatus;
use activityflow_shared::activity::{ActivityDto, CreateActivityDto, UpdateActivityDto};
use activityflow_shared::category::CategoryDto;
use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::{category_service, insert_failure};
use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::validation;

const ACTIVITY_NOT_FOUND: &str = "Activity not found";
const DEFAULT_DURATION_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialStatus {
    Id(i64),
    Named(ActivityStatus),
}

/// The requested status row, or `Pending` when none was given.
pub fn initial_status(dto: &CreateActivityDto) -> InitialStatus {
    match dto.status_id {
        Some(id) => InitialStatus::Id(id),
        None => InitialStatus::Named(ActivityStatus::Pending),
    }
}

/// Insert shape for a new activity: it starts `now` and ends a week later.
pub fn new_activity(dto: &CreateActivityDto, owner: Uuid, status_id: i64, now: DateTime<Utc>) -> NewActivity {
    NewActivity {
        title: dto.title.trim().to_string(),
        description: dto.description.clone(),
        start_date: now,
        end_date: Some(now + Duration::days(DEFAULT_DURATION_DAYS)),
        due_date: dto.due_date,
        priority: dto.priority,
        status_id,
        category_id: dto.category_id,
        user_id: owner,
        assigned_to_id: dto.assigned_to_user_id,
    }
}

pub fn to_dto(view: ActivityView) -> AppResult<ActivityDto> {
    let status = view
        .status_name
        .parse::<ActivityStatus>()
        .with_context(|| format!("Activity {} has unknown status {}", view.id, view.status_name))?;

    Ok(ActivityDto {
        id: view.id,
        title: view.title,
        description: view.description,
        created_at: view.created_at,
        start_date: view.start_date,
        end_date: view.end_date,
        due_date: view.due_date,
        completed_at: view.completed_at,
        priority: view.priority,
        status_id: view.status_id,
        status,
        category_id: view.category_id,
        category_name: view.category_name,
        created_by_user_id: view.user_id,
        created_by_user_name: view.user_name,
        assigned_to_user_id: view.assigned_to_id,
        assigned_to_user_name: view.assigned_to_name,
    })
}

fn to_dtos(views: Vec<ActivityView>) -> AppResult<Vec<ActivityDto>> {
    views.into_iter().map(to_dto).collect()
}

/// Owner, assignee, managers and admins may edit an activity.
pub fn can_modify(caller: &AuthUser, owner: Uuid, assignee: Option<Uuid>) -> bool {
    if caller.is_admin() || caller.is_manager() {
        return true;
    }
    caller
        .id()
        .is_ok_and(|id| id == owner || assignee == Some(id))
}

/// Only the owner or an admin may delete an activity.
pub fn can_delete(caller: &AuthUser, owner: Uuid) -> bool {
    caller.is_admin() || caller.id().is_ok_and(|id| id == owner)
}

/// `completed_at` after moving from `previous` to `next`.
pub fn completed_at_after(
    previous: ActivityStatus,
    completed_at: Option<DateTime<Utc>>,
    next: ActivityStatus,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (previous, next) {
        (ActivityStatus::Completed, ActivityStatus::Completed) => completed_at.or(Some(now)),
        (_, ActivityStatus::Completed) => Some(now),
        _ => None,
    }
}

pub struct ActivityService {
    activities: ActivityRepository,
    statuses: StatusRepository,
    categories: CategoryRepository,
    users: UserRepository,
}

impl ActivityService {
    pub fn new(
        activities: ActivityRepository,
        statuses: StatusRepository,
        categories: CategoryRepository,
        users: UserRepository,
    ) -> Self {
        Self {
            activities,
            statuses,
            categories,
            users,
        }
    }

    pub async fn get_all(&self) -> AppResult<Vec<ActivityDto>> {
        to_dtos(self.activities.get_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<ActivityDto> {
        let view = self
            .activities
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(ACTIVITY_NOT_FOUND))?;
        to_dto(view)
    }

    pub async fn get_by_user(&self, user_id: Uuid) -> AppResult<Vec<ActivityDto>> {
        to_dtos(self.activities.get_by_user(user_id).await?)
    }

    pub async fn get_by_category(&self, category_id: i64) -> AppResult<Vec<ActivityDto>> {
        to_dtos(self.activities.get_by_category(category_id).await?)
    }

    pub async fn categories(&self) -> AppResult<Vec<CategoryDto>> {
        let categories = self.categories.get_all().await?;
        Ok(categories.into_iter().map(category_service::to_dto).collect())
    }

    async fn ensure_references(&self, category_id: Option<i64>, assignee: Option<Uuid>) -> AppResult<()> {
        if let Some(category_id) = category_id {
            if !self.categories.exists(category_id).await? {
                return Err(AppError::BadRequest(format!("Category {category_id} does not exist")));
            }
        }
        if let Some(assignee) = assignee {
            if self.users.get_by_id(assignee).await?.is_none() {
                return Err(AppError::BadRequest(format!("User {assignee} does not exist")));
            }
        }
        Ok(())
    }

    pub async fn create(&self, caller: &AuthUser, dto: &CreateActivityDto) -> AppResult<ActivityDto> {
        let now = Utc::now();
        validation::validate_create_activity(dto, now)?;
        let owner = caller.id()?;

        let status_id = match initial_status(dto) {
            InitialStatus::Id(id) => {
                self.statuses
                    .get_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::BadRequest(format!("Status {id} does not exist")))?
                    .id
            }
            InitialStatus::Named(name) => {
                self.statuses
                    .get_by_name(name)
                    .await?
                    .with_context(|| format!("Default status '{name}' has not been seeded"))?
                    .id
            }
        };
        self.ensure_references(dto.category_id, dto.assigned_to_user_id).await?;

        let id = self
            .activities
            .create(&new_activity(dto, owner, status_id, now))
            .await
            .map_err(|e| insert_failure(e, OWNER_FK))?;

        tracing::info!("Activity {} created by {}", id, owner);
        self.get_by_id(id).await
    }

    pub async fn update(&self, caller: &AuthUser, id: i64, dto: &UpdateActivityDto) -> AppResult<()> {
        let now = Utc::now();
        validation::validate_update_activity(dto, now)?;
        let next_status = dto
            .status
            .parse::<ActivityStatus>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let current = self
            .activities
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(ACTIVITY_NOT_FOUND))?;
        if !can_modify(caller, current.user_id, current.assigned_to_id) {
            return Err(AppError::Forbidden("Not allowed to modify this activity".to_string()));
        }

        let status = self
            .statuses
            .get_by_name(next_status)
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("Status {next_status} is not configured")))?;
        self.ensure_references(dto.category_id, dto.assigned_to_user_id).await?;

        let previous_status = current.status_name.parse().unwrap_or(ActivityStatus::Pending);
        let changes = ActivityChanges {
            title: dto.title.trim().to_string(),
            description: dto.description.clone(),
            category_id: dto.category_id,
            status_id: status.id,
            priority: dto.priority.unwrap_or(current.priority),
            due_date: dto.due_date.or(current.due_date),
            completed_at: completed_at_after(previous_status, current.completed_at, next_status, now),
            assigned_to_id: dto.assigned_to_user_id.or(current.assigned_to_id),
        };

        if !self.activities.update(id, &changes).await? {
            return Err(AppError::not_found(ACTIVITY_NOT_FOUND));
        }
        tracing::info!("Activity {} updated by {} (status {})", id, caller.email(), next_status);
        Ok(())
    }

    pub async fn delete(&self, caller: &AuthUser, id: i64) -> AppResult<()> {
        let (owner, _) = self
            .activities
            .owner_of(id)
            .await?
            .ok_or_else(|| AppError::not_found(ACTIVITY_NOT_FOUND))?;
        if !can_delete(caller, owner) {
            return Err(AppError::Forbidden("Only the owner or an admin can delete this activity".to_string()));
        }

        if !self.activities.delete(id).await? {
            return Err(AppError::not_found(ACTIVITY_NOT_FOUND));
        }
        tracing::info!("Activity {} deleted by {}", id, caller.email());
        Ok(())
    }
}
