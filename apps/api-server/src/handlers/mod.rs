//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;
mod tags;

use actix_web::{error, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| error::Error::from(AppError::BadRequest(err.to_string()))),
    )
    .app_data(
        web::FormConfig::default()
            .error_handler(|err, _req| error::Error::from(AppError::BadRequest(err.to_string()))),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| error::Error::from(AppError::BadRequest(err.to_string()))),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| error::Error::from(AppError::NotFound(err.to_string()))),
    )
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .route("/auth", web::post().to(auth::login))
            .route("/auth/me", web::get().to(auth::me))
            .route("/logout", web::post().to(auth::logout))
            // Content routes
            .route("/tags", web::get().to(tags::list_tags))
            .service(
                web::resource("/posts")
                    .route(web::get().to(posts::list_posts))
                    .route(web::post().to(posts::create_post)),
            )
            .service(
                web::resource("/posts/{id}")
                    .route(web::get().to(posts::get_post))
                    .route(web::put().to(posts::update_post))
                    .route(web::delete().to(posts::delete_post)),
            )
            .route("/posts/{id}/tags", web::get().to(posts::list_post_tags))
            .service(
                web::resource("/posts/{id}/comments")
                    .route(web::get().to(comments::list_comments))
                    .route(web::post().to(comments::create_comment)),
            )
            .service(
                web::resource("/posts/{id}/comments/{cid}")
                    .route(web::get().to(comments::get_comment))
                    .route(web::delete().to(comments::delete_comment)),
            ),
    );
}
