//! Comment entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub post_id: i32,
    pub author: String,
    pub posted_time: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Text")]
    pub content: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Comment.
impl From<Model> for wordless_core::domain::Comment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            author: model.author,
            posted_time: model.posted_time.into(),
            content: model.content,
        }
    }
}

/// Conversion from a new Domain Comment to a SeaORM ActiveModel; the id is
/// left for the database to assign.
impl From<wordless_core::domain::NewComment> for ActiveModel {
    fn from(comment: wordless_core::domain::NewComment) -> Self {
        Self {
            post_id: Set(comment.post_id),
            author: Set(comment.author),
            posted_time: Set(comment.posted_time.into()),
            content: Set(comment.content),
            ..Default::default()
        }
    }
}
