//! Post repository: CRUD plus the post/comment/tag aggregation query.

use async_trait::async_trait;
use sea_orm::sea_query::{Condition, Expr, Func, Query};
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set, TransactionTrait,
    prelude::DateTimeWithTimeZone,
};

use wordless_core::domain::{
    Comment, NewPost, Post, PostFilter, PostId, PostRow, PostUpdate, Tag, aggregate_posts,
};
use wordless_core::error::RepoError;
use wordless_core::ports::PostRepository;

use super::base::{SeaRepository, query_error, transaction_error};
use super::entity::{comment, post, post_tag, tag};

/// SeaORM post repository.
pub type SeaPostRepository = SeaRepository<post::Entity>;

/// One flat row of the post/comment/tag join. Comment and tag columns are
/// aliased with `c_` / `t_` prefixes and are null when the outer join missed.
#[derive(Debug, FromQueryResult)]
struct PostJoinRow {
    id: i32,
    title: String,
    slug: String,
    public: bool,
    locked: bool,
    posted_time: DateTimeWithTimeZone,
    edited_time: Option<DateTimeWithTimeZone>,
    summary: String,
    content: String,
    c_id: Option<i32>,
    c_author: Option<String>,
    c_posted_time: Option<DateTimeWithTimeZone>,
    c_content: Option<String>,
    t_id: Option<i32>,
    t_name: Option<String>,
}

impl PostJoinRow {
    fn into_row(self) -> PostRow {
        let comment = match (self.c_id, self.c_author, self.c_posted_time, self.c_content) {
            (Some(id), Some(author), Some(posted_time), Some(content)) => Some(Comment {
                id,
                post_id: self.id,
                author,
                posted_time: posted_time.into(),
                content,
            }),
            _ => None,
        };

        let tag = match (self.t_id, self.t_name) {
            (Some(id), Some(name)) => Some(Tag { id, name }),
            _ => None,
        };

        let post: Post = post::Model {
            id: self.id,
            title: self.title,
            slug: self.slug,
            public: self.public,
            locked: self.locked,
            posted_time: self.posted_time,
            edited_time: self.edited_time,
            summary: self.summary,
            content: self.content,
        }
        .into();

        PostRow { post, comment, tag }
    }
}

/// The base aggregation query: every post, left-joined with all of its
/// comments and all of its tags, ordered so that posts come newest first and
/// comments within a post newest first.
fn joined_posts() -> Select<post::Entity> {
    post::Entity::find()
        .column_as(comment::Column::Id, "c_id")
        .column_as(comment::Column::Author, "c_author")
        .column_as(comment::Column::PostedTime, "c_posted_time")
        .column_as(comment::Column::Content, "c_content")
        .column_as(tag::Column::Id, "t_id")
        .column_as(tag::Column::Name, "t_name")
        .join(JoinType::LeftJoin, post::Relation::Comment.def())
        .join(JoinType::LeftJoin, post::Relation::PostTag.def())
        .join(JoinType::LeftJoin, post_tag::Relation::Tag.def())
        .order_by_desc(post::Column::PostedTime)
        .order_by_desc(post::Column::Id)
        .order_by_desc(comment::Column::PostedTime)
        .order_by_desc(comment::Column::Id)
        .order_by_asc(tag::Column::Id)
}

/// Case-insensitive substring match over title, summary and content.
fn text_condition(query: &str) -> Condition {
    let pattern = format!("%{}%", query.to_lowercase());
    [post::Column::Title, post::Column::Summary, post::Column::Content]
        .into_iter()
        .fold(Condition::any(), |cond, column| {
            cond.add(
                Expr::expr(Func::lower(Expr::col((post::Entity, column)))).like(pattern.clone()),
            )
        })
}

/// Restrict to posts carrying the tag `name`, without narrowing their tag list.
fn tag_condition(name: &str) -> Condition {
    let tagged_posts = Query::select()
        .column((post_tag::Entity, post_tag::Column::PostId))
        .from(post_tag::Entity)
        .inner_join(
            tag::Entity,
            Expr::col((tag::Entity, tag::Column::Id))
                .equals((post_tag::Entity, post_tag::Column::TagId)),
        )
        .and_where(Expr::col((tag::Entity, tag::Column::Name)).eq(name))
        .to_owned();

    Condition::all().add(post::Column::Id.in_subquery(tagged_posts))
}

fn filtered_posts(filter: &PostFilter) -> Select<post::Entity> {
    let mut select = joined_posts();
    if let Some(query) = &filter.query {
        select = select.filter(text_condition(query));
    }
    if let Some(tag) = &filter.tag {
        select = select.filter(tag_condition(tag));
    }
    select
}

async fn fetch_aggregated(db: &DbConn, select: Select<post::Entity>) -> Result<Vec<Post>, RepoError> {
    let rows = select
        .into_model::<PostJoinRow>()
        .all(db)
        .await
        .map_err(query_error)?;

    tracing::trace!(rows = rows.len(), "Folding joined post rows");
    Ok(aggregate_posts(rows.into_iter().map(PostJoinRow::into_row)))
}

#[async_trait]
impl PostRepository for SeaPostRepository {
    async fn find(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(query = ?filter.query, tag = ?filter.tag, "Finding posts");
        fetch_aggregated(&self.db, filtered_posts(filter)).await
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let select = joined_posts().filter(post::Column::Id.eq(id));
        let posts = fetch_aggregated(&self.db, select).await?;
        Ok(posts.into_iter().next())
    }

    async fn insert(&self, new_post: NewPost) -> Result<PostId, RepoError> {
        let model = post::ActiveModel {
            title: Set(new_post.title),
            slug: Set(new_post.slug),
            public: Set(new_post.public),
            locked: Set(new_post.locked),
            posted_time: Set(new_post.posted_time.into()),
            edited_time: Set(None),
            summary: Set(new_post.summary),
            content: Set(new_post.content),
            ..Default::default()
        };

        let result = post::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        tracing::debug!(post_id = result.last_insert_id, "Post inserted");
        Ok(result.last_insert_id)
    }

    async fn update(&self, id: PostId, update: PostUpdate) -> Result<(), RepoError> {
        let edited_time: DateTimeWithTimeZone = update.edited_time.into();

        let result = post::Entity::update_many()
            .col_expr(post::Column::Title, Expr::value(update.title))
            .col_expr(post::Column::Slug, Expr::value(update.slug))
            .col_expr(post::Column::Public, Expr::value(update.public))
            .col_expr(post::Column::Locked, Expr::value(update.locked))
            .col_expr(post::Column::Summary, Expr::value(update.summary))
            .col_expr(post::Column::Content, Expr::value(update.content))
            .col_expr(post::Column::EditedTime, Expr::value(Some(edited_time)))
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(transaction_error)?;

        comment::Entity::delete_many()
            .filter(comment::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(query_error)?;
        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(query_error)?;
        let result = post::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(query_error)?;

        txn.commit().await.map_err(transaction_error)?;

        tracing::debug!(post_id = id, deleted = result.rows_affected, "Post deleted");
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        post::Entity::find()
            .count(&self.db)
            .await
            .map_err(query_error)
    }
}
