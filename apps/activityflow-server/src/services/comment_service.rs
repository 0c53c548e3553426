use activityflow_db::models::comment::Comment;
use activityflow_db::repositories::activity_repo::ActivityRepository;
use activityflow_db::repositories::comment_repo::{AUTHOR_FK, CommentRepository};
use activityflow_shared::comment::{CommentDto, CreateCommentDto};

use super::insert_failure;
use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::validation;

const COMMENT_NOT_FOUND: &str = "Comment not found";

pub fn to_dto(comment: Comment) -> CommentDto {
    CommentDto {
        id: comment.id,
        activity_id: comment.activity_id,
        user_id: comment.user_id,
        user_name: comment.user_name,
        content: comment.content,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

/// Only the author or an admin may delete a comment, and only through the
/// activity it belongs to.
pub fn authorize_delete(caller: &AuthUser, comment: Option<&Comment>, activity_id: i64) -> AppResult<()> {
    let comment = comment
        .filter(|c| c.activity_id == activity_id)
        .ok_or_else(|| AppError::not_found(COMMENT_NOT_FOUND))?;

    let is_author = caller.id().is_ok_and(|id| id == comment.user_id);
    if !is_author && !caller.is_admin() {
        return Err(AppError::Forbidden("Only the author or an admin can delete this comment".to_string()));
    }
    Ok(())
}

/// A comment removed by someone else in the meantime is reported as missing.
pub fn deleted_or_not_found(deleted: bool) -> AppResult<()> {
    if deleted {
        Ok(())
    } else {
        Err(AppError::not_found(COMMENT_NOT_FOUND))
    }
}

pub struct CommentService {
    comments: CommentRepository,
    activities: ActivityRepository,
}

impl CommentService {
    pub fn new(comments: CommentRepository, activities: ActivityRepository) -> Self {
        Self { comments, activities }
    }

    async fn ensure_activity(&self, activity_id: i64) -> AppResult<()> {
        match self.activities.owner_of(activity_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("Activity not found")),
        }
    }

    pub async fn list(&self, activity_id: i64) -> AppResult<Vec<CommentDto>> {
        self.ensure_activity(activity_id).await?;
        let comments = self.comments.get_by_activity(activity_id).await?;
        Ok(comments.into_iter().map(to_dto).collect())
    }

    pub async fn create(&self, caller: &AuthUser, activity_id: i64, dto: &CreateCommentDto) -> AppResult<CommentDto> {
        validation::validate_comment(&dto.content)?;
        let author = caller.id()?;
        self.ensure_activity(activity_id).await?;

        let id = self
            .comments
            .create(activity_id, author, dto.content.trim())
            .await
            .map_err(|e| insert_failure(e, AUTHOR_FK))?;
        tracing::debug!("Comment {} added to activity {}", id, activity_id);

        self.comments
            .get_by_id(id)
            .await?
            .map(to_dto)
            .ok_or_else(|| AppError::not_found(COMMENT_NOT_FOUND))
    }

    pub async fn delete(&self, caller: &AuthUser, activity_id: i64, comment_id: i64) -> AppResult<()> {
        let comment = self.comments.get_by_id(comment_id).await?;
        authorize_delete(caller, comment.as_ref(), activity_id)?;
        deleted_or_not_found(self.comments.delete(comment_id).await?)?;
        tracing::debug!("Comment {} removed from activity {}", comment_id, activity_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::user_service::auth_user;
    use activityflow_shared::user::{ROLE_ADMIN, ROLE_MANAGER, ROLE_USER};
    use chrono::Utc;
    use uuid::Uuid;

    fn comment(author: Uuid, activity_id: i64) -> Comment {
        Comment {
            id: 9,
            content: "Looks good".into(),
            user_id: author,
            user_name: "user1".into(),
            activity_id,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn authors_and_admins_may_delete() {
        let author = Uuid::new_v4();
        let other = Uuid::new_v4();
        let c = comment(author, 4);

        assert!(authorize_delete(&auth_user(author, &[ROLE_USER]), Some(&c), 4).is_ok());
        assert!(authorize_delete(&auth_user(other, &[ROLE_ADMIN]), Some(&c), 4).is_ok());
        assert!(matches!(
            authorize_delete(&auth_user(other, &[ROLE_MANAGER]), Some(&c), 4),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn comments_are_scoped_to_their_activity() {
        let author = Uuid::new_v4();
        let caller = auth_user(author, &[ROLE_USER]);
        assert!(matches!(
            authorize_delete(&caller, Some(&comment(author, 4)), 5),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(authorize_delete(&caller, None, 4), Err(AppError::NotFound(_))));
    }

    #[test]
    fn vanished_comments_are_not_found() {
        assert!(deleted_or_not_found(true).is_ok());
        assert!(matches!(deleted_or_not_found(false), Err(AppError::NotFound(_))));
    }
}
