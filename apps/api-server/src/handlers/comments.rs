//! Comment handlers.

use actix_web::{HttpResponse, http::header, web};
use chrono::Utc;

use wordless_core::DomainError;
use wordless_core::domain::{CommentId, NewComment, PostId};
use wordless_shared::dto::CommentRequest;

use super::posts::existing_post;
use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts/{id}/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    existing_post(&state, post_id).await?;
    let comments = state.comments.find_by_post(post_id).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// POST /api/posts/{id}/comments - open to anyone unless the post is locked.
pub async fn create_comment(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let body = body.into_inner();

    let post = existing_post(&state, post_id).await?;
    post.ensure_accepts_comments()?;

    let id = state
        .comments
        .insert(NewComment::new(post_id, body.author, body.content, Utc::now()))
        .await?;

    Ok(HttpResponse::Created()
        .insert_header((
            header::LOCATION,
            format!("/api/posts/{post_id}/comments/{id}"),
        ))
        .finish())
}

/// GET /api/posts/{id}/comments/{cid}
pub async fn get_comment(
    state: web::Data<AppState>,
    path: web::Path<(PostId, CommentId)>,
) -> AppResult<HttpResponse> {
    let (post_id, id) = path.into_inner();

    let comment = state
        .comments
        .find_by_id(id)
        .await?
        .filter(|comment| comment.post_id == post_id)
        .ok_or_else(|| DomainError::not_found("Comment", id))?;

    Ok(HttpResponse::Ok().json(comment))
}

/// DELETE /api/posts/{id}/comments/{cid}
pub async fn delete_comment(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    path: web::Path<(PostId, CommentId)>,
) -> AppResult<HttpResponse> {
    let (post_id, id) = path.into_inner();

    state.comments.delete(post_id, id).await?;

    tracing::info!(post_id, comment_id = id, "Comment deleted");
    Ok(HttpResponse::NoContent().finish())
}
