//! Tag handlers.

use actix_web::{HttpResponse, web};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/tags - tags attached to at least one post.
pub async fn list_tags(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.tags.find_used().await?;
    Ok(HttpResponse::Ok().json(tags))
}
