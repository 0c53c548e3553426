use activityflow_db::models::status::Status;
use activityflow_db::repositories::status_repo::StatusRepository;
use activityflow_db::{FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION, has_db_code};
use activityflow_shared::ActivityStatus;
use activityflow_shared::status::{CreateStatusDto, StatusDto, UpdateStatusDto};
use anyhow::Context;

use crate::error::{AppError, AppResult};
use crate::validation;

const STATUS_NOT_FOUND: &str = "Status not found";

pub fn to_dto(status: Status) -> AppResult<StatusDto> {
    let name = status
        .name
        .parse::<ActivityStatus>()
        .with_context(|| format!("Status {} has unknown name {}", status.id, status.name))?;
    Ok(StatusDto {
        id: status.id,
        name,
        description: status.description,
        order: status.display_order,
        color: status.color,
    })
}

pub struct StatusService {
    statuses: StatusRepository,
}

impl StatusService {
    pub fn new(statuses: StatusRepository) -> Self {
        Self { statuses }
    }

    pub async fn get_all(&self) -> AppResult<Vec<StatusDto>> {
        self.statuses.get_all().await?.into_iter().map(to_dto).collect()
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<StatusDto> {
        let status = self
            .statuses
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(STATUS_NOT_FOUND))?;
        to_dto(status)
    }

    pub async fn create(&self, dto: &CreateStatusDto) -> AppResult<StatusDto> {
        validation::validate_create_status(dto)?;
        let color = dto.color.as_deref().unwrap_or(dto.name.default_color());

        match self
            .statuses
            .create(dto.name, dto.description.as_deref(), dto.order, color)
            .await
        {
            Ok(status) => {
                tracing::info!("Status {} created", status.name);
                to_dto(status)
            }
            Err(e) if has_db_code(&e, UNIQUE_VIOLATION) => {
                Err(AppError::Conflict(format!("Status {} already exists", dto.name)))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn update(&self, id: i64, dto: &UpdateStatusDto) -> AppResult<StatusDto> {
        validation::validate_update_status(dto)?;
        let status = self
            .statuses
            .update(id, dto.description.as_deref(), dto.order, dto.color.as_deref())
            .await?
            .ok_or_else(|| AppError::not_found(STATUS_NOT_FOUND))?;
        to_dto(status)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        match self.statuses.delete(id).await {
            Ok(true) => {
                tracing::info!("Status {} deleted", id);
                Ok(())
            }
            Ok(false) => Err(AppError::not_found(STATUS_NOT_FOUND)),
            Err(e) if has_db_code(&e, FOREIGN_KEY_VIOLATION) => {
                Err(AppError::Conflict("Status is still used by activities".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_display_order_to_order() {
        let dto = to_dto(Status {
            id: 2,
            name: "InProgress".into(),
            description: Some("Task is in progress".into()),
            display_order: 2,
            color: "#2196F3".into(),
        })
        .unwrap();
        assert_eq!(dto.name, ActivityStatus::InProgress);
        assert_eq!(dto.order, 2);
    }
}
