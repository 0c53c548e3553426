use activityflow_db::models::category::Category;
use activityflow_db::repositories::category_repo::{CategoryChanges, CategoryRepository};
use activityflow_shared::category::{CategoryDto, CreateCategoryDto, UpdateCategoryDto};

use crate::error::{AppError, AppResult};
use crate::validation;

const CATEGORY_NOT_FOUND: &str = "Category not found";

pub fn to_dto(category: Category) -> CategoryDto {
    CategoryDto {
        id: category.id,
        name: category.name,
        description: category.description,
        color: category.color,
        is_active: category.is_active,
    }
}

pub struct CategoryService {
    categories: CategoryRepository,
}

impl CategoryService {
    pub fn new(categories: CategoryRepository) -> Self {
        Self { categories }
    }

    pub async fn get_all(&self) -> AppResult<Vec<CategoryDto>> {
        let categories = self.categories.get_all().await?;
        Ok(categories.into_iter().map(to_dto).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<CategoryDto> {
        self.categories
            .get_by_id(id)
            .await?
            .map(to_dto)
            .ok_or_else(|| AppError::not_found(CATEGORY_NOT_FOUND))
    }

    pub async fn create(&self, dto: &CreateCategoryDto) -> AppResult<CategoryDto> {
        validation::validate_create_category(dto)?;
        let category = self
            .categories
            .create(dto.name.trim(), dto.description.as_deref(), &dto.color)
            .await?;
        tracing::info!("Category {} created ({})", category.id, category.name);
        Ok(to_dto(category))
    }

    pub async fn update(&self, id: i64, dto: &UpdateCategoryDto) -> AppResult<CategoryDto> {
        validation::validate_update_category(dto)?;
        let changes = CategoryChanges {
            name: dto.name.as_deref().map(|n| n.trim().to_string()),
            description: dto.description.clone(),
            color: dto.color.clone(),
            is_active: dto.is_active,
        };
        self.categories
            .update(id, &changes)
            .await?
            .map(to_dto)
            .ok_or_else(|| AppError::not_found(CATEGORY_NOT_FOUND))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.categories.delete(id).await? {
            return Err(AppError::not_found(CATEGORY_NOT_FOUND));
        }
        tracing::info!("Category {} deleted", id);
        Ok(())
    }
}
