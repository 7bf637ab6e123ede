//! Post handlers.

use actix_web::{HttpResponse, http::header, web};
use chrono::Utc;
use serde::Deserialize;

use wordless_core::DomainError;
use wordless_core::domain::{NewPost, Post, PostDraft, PostFilter, PostId, PostUpdate};
use wordless_shared::dto::PostRequest;

use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub query: Option<String>,
    pub tag: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<ListQuery> for PostFilter {
    fn from(params: ListQuery) -> Self {
        PostFilter {
            query: non_blank(params.query),
            tag: non_blank(params.tag),
        }
    }
}

fn split_request(body: PostRequest) -> (PostDraft, Option<Vec<String>>) {
    let draft = PostDraft {
        title: body.title,
        public: body.public,
        locked: body.locked,
        summary: body.summary,
        content: body.content,
    };
    (draft, body.tags)
}

/// Load a post or fail with 404.
pub(crate) async fn existing_post(state: &AppState, id: PostId) -> AppResult<Post> {
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", id))?;
    Ok(post)
}

/// GET /api/posts?query=&tag=
pub async fn list_posts(
    state: web::Data<AppState>,
    params: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let filter = PostFilter::from(params.into_inner());
    tracing::debug!(query = ?filter.query, tag = ?filter.tag, "Listing posts");

    let posts = state.posts.find(&filter).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    AdminIdentity(identity): AdminIdentity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let (draft, tags) = split_request(body.into_inner());

    let id = state
        .posts
        .insert(NewPost::from_draft(draft, Utc::now()))
        .await?;
    if let Some(tags) = tags {
        state.tags.set_post_tags(id, &tags).await?;
    }

    tracing::info!(post_id = id, username = %identity.username, "Post created");
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/posts/{id}")))
        .finish())
}

/// GET /api/posts/{id}
pub async fn get_post(state: web::Data<AppState>, path: web::Path<PostId>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    tracing::debug!(post_id = id, "Fetching post");

    let post = existing_post(&state, id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    path: web::Path<PostId>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let (draft, tags) = split_request(body.into_inner());

    state
        .posts
        .update(id, PostUpdate::from_draft(draft, Utc::now()))
        .await?;
    if let Some(tags) = tags {
        state.tags.set_post_tags(id, &tags).await?;
    }

    tracing::info!(post_id = id, "Post updated");
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    state.posts.delete(id).await?;

    tracing::info!(post_id = id, "Post deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/posts/{id}/tags
pub async fn list_post_tags(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    existing_post(&state, id).await?;
    let tags = state.tags.find_by_post(id).await?;
    Ok(HttpResponse::Ok().json(tags))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_params_mean_no_filter() {
        let filter = PostFilter::from(ListQuery {
            query: Some("  ".to_string()),
            tag: Some(String::new()),
        });

        assert_eq!(filter, PostFilter::all());
    }

    #[test]
    fn test_params_are_kept() {
        let filter = PostFilter::from(ListQuery {
            query: Some("kitten".to_string()),
            tag: Some("cute-animals".to_string()),
        });

        assert_eq!(filter, PostFilter::all().with_query("kitten").with_tag("cute-animals"));
    }
}
