use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
};

use wordless_core::domain::{PostId, Tag, TagId, assignable_tag_names};
use wordless_core::error::RepoError;
use wordless_core::ports::TagRepository;

use super::base::{SeaRepository, query_error, transaction_error};
use super::entity::post_tag;
use super::entity::tag::{self, Entity as TagEntity};

/// SeaORM tag repository.
pub type SeaTagRepository = SeaRepository<TagEntity>;

#[async_trait]
impl TagRepository for SeaTagRepository {
    async fn find_used(&self) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .join(JoinType::InnerJoin, tag::Relation::PostTag.def())
            .distinct()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_post(&self, post_id: PostId) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .join(JoinType::InnerJoin, tag::Relation::PostTag.def())
            .filter(post_tag::Column::PostId.eq(post_id))
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, name: &str) -> Result<TagId, RepoError> {
        let model = tag::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        let result = TagEntity::insert(model)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.last_insert_id)
    }

    async fn set_post_tags(&self, post_id: PostId, names: &[String]) -> Result<(), RepoError> {
        let names = assignable_tag_names(names);
        tracing::debug!(post_id, tags = ?names, "Replacing post tags");

        // Dropping the transaction without commit rolls every step back.
        let txn = self.db.begin().await.map_err(transaction_error)?;

        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .map_err(query_error)?;

        for name in names {
            let existing = TagEntity::find()
                .filter(tag::Column::Name.eq(name.as_str()))
                .one(&txn)
                .await
                .map_err(query_error)?;

            let tag_id = match existing {
                Some(tag) => tag.id,
                None => {
                    let model = tag::ActiveModel {
                        name: Set(name),
                        ..Default::default()
                    };
                    TagEntity::insert(model)
                        .exec(&txn)
                        .await
                        .map_err(query_error)?
                        .last_insert_id
                }
            };

            let link = post_tag::ActiveModel {
                post_id: Set(post_id),
                tag_id: Set(tag_id),
            };
            post_tag::Entity::insert(link)
                .exec_without_returning(&txn)
                .await
                .map_err(query_error)?;
        }

        txn.commit().await.map_err(transaction_error)
    }
}
