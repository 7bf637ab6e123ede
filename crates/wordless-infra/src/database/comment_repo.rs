use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use wordless_core::domain::{Comment, CommentId, NewComment, PostId};
use wordless_core::error::RepoError;
use wordless_core::ports::CommentRepository;

use super::base::{SeaRepository, query_error};
use super::entity::comment::{self, Entity as CommentEntity};

/// SeaORM comment repository.
pub type SeaCommentRepository = SeaRepository<CommentEntity>;

#[async_trait]
impl CommentRepository for SeaCommentRepository {
    async fn find_by_post(&self, post_id: PostId) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::PostedTime)
            .order_by_desc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, RepoError> {
        let result = CommentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, comment: NewComment) -> Result<CommentId, RepoError> {
        let post_id = comment.post_id;
        let active_model: comment::ActiveModel = comment.into();

        let result = CommentEntity::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        tracing::debug!(post_id, comment_id = result.last_insert_id, "Comment inserted");
        Ok(result.last_insert_id)
    }

    async fn delete(&self, post_id: PostId, id: CommentId) -> Result<(), RepoError> {
        let result = CommentEntity::delete_many()
            .filter(comment::Column::Id.eq(id))
            .filter(comment::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        tracing::debug!(post_id, comment_id = id, deleted = result.rows_affected, "Comment deleted");
        Ok(())
    }
}
