use std::sync::Arc;

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};

use api_server::{AppState, AuthConfig, JwtAuthentication, RequestIdMiddleware, configure_routes};
use migration::{Migrator, MigratorTrait};
use wordless_core::ports::{AuthError, CredentialStore, Principal};
use wordless_shared::dto::LoginRequest;

const ADMIN: &str = "admin";
const PASSWORD: &str = "correct horse";

async fn test_state() -> AppState {
    let opts = ConnectOptions::new("sqlite::memory:")
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false)
        .to_owned();
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let auth = AuthConfig {
        admin_username: ADMIN.to_string(),
        admin_password: PASSWORD.to_string(),
        ..AuthConfig::default()
    };
    AppState::init(db, &auth).await.unwrap()
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(JwtAuthentication::new(&$state))
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn bearer(state: &AppState) -> (header::HeaderName, String) {
    let token = state.tokens.generate_token(ADMIN).unwrap();
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

fn response_cookie<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.into_owned())
}

fn post_body(title: &str) -> Value {
    json!({ "title": title, "content": "some content" })
}

/// Identities without the admin role.
struct ReaderStore;

#[async_trait]
impl CredentialStore for ReaderStore {
    async fn authenticate(&self, _username: &str, _password: &str) -> Result<Principal, AuthError> {
        Err(AuthError::InvalidCredentials)
    }

    async fn find_principal(&self, username: &str) -> Result<Option<Principal>, AuthError> {
        Ok(Some(Principal {
            username: username.to_string(),
            roles: Vec::new(),
        }))
    }
}

#[actix_rt::test]
async fn test_health_echoes_request_id() {
    let state = test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Request-ID", "trace-me"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "trace-me");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_rt::test]
async fn test_json_login_issues_header_and_cookies() {
    let state = test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth")
        .set_json(json!({ "username": ADMIN, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    let auth = resp.headers().get(header::AUTHORIZATION).unwrap().to_str().unwrap();
    let token = auth.strip_prefix("Bearer ").unwrap();
    assert_eq!(state.tokens.validate_token(token).unwrap().subject, ADMIN);

    let token_cookie = response_cookie(&resp, "jwt_token").unwrap();
    assert_eq!(token_cookie.value(), token);
    assert_eq!(token_cookie.http_only(), Some(true));
    assert_eq!(token_cookie.path(), Some("/api"));
    assert_eq!(token_cookie.max_age(), Some(Duration::days(7)));
    assert_eq!(token_cookie.same_site(), Some(SameSite::Strict));

    let authed_cookie = response_cookie(&resp, "jwt_authed").unwrap();
    assert_eq!(authed_cookie.value(), "1");
    assert_eq!(authed_cookie.path(), Some("/"));
    assert_ne!(authed_cookie.http_only(), Some(true));
    assert_eq!(authed_cookie.same_site(), Some(SameSite::Strict));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], ADMIN);
    assert_eq!(body["roles"], json!(["admin"]));
}

#[actix_rt::test]
async fn test_form_login() {
    let state = test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth")
        .set_form(LoginRequest {
            username: ADMIN.to_string(),
            password: PASSWORD.to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(response_cookie(&resp, "jwt_token").is_some());
}

#[actix_rt::test]
async fn test_failed_login_clears_stale_cookies() {
    let state = test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth")
        .cookie(Cookie::new("jwt_authed", "1"))
        .set_json(json!({ "username": ADMIN, "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(header::AUTHORIZATION).is_none());
    let cleared = response_cookie(&resp, "jwt_authed").unwrap();
    assert_eq!(cleared.max_age(), Some(Duration::ZERO));
    assert!(response_cookie(&resp, "jwt_token").is_none());
}

#[actix_rt::test]
async fn test_admin_routes_reject_anonymous() {
    let state = test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(post_body("Nope"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::delete().uri("/api/posts/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_identity_without_admin_role_is_forbidden() {
    let mut state = test_state().await;
    state.credentials = Arc::new(ReaderStore);
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&state))
        .set_json(post_body("Nope"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_post_lifecycle() {
    let state = test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&state))
        .set_json(post_body("Hello World"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let url = location(&resp);
    assert!(url.starts_with("/api/posts/"));

    let created: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri(&url).to_request()).await;
    assert_eq!(created["slug"], "hello-world");
    assert_eq!(created["public"], true);
    assert_eq!(created["locked"], false);
    assert_eq!(created["summary"], "");
    assert!(created["postedTime"].is_string());
    assert!(created["editedTime"].is_null());
    assert_eq!(created["comments"], json!([]));
    assert_eq!(created["tags"], json!([]));

    let req = test::TestRequest::put()
        .uri(&url)
        .insert_header(bearer(&state))
        .set_json(json!({ "title": "Hello Again", "content": "edited", "locked": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let updated: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri(&url).to_request()).await;
    assert_eq!(updated["slug"], "hello-again");
    assert_eq!(updated["locked"], true);
    assert_eq!(updated["postedTime"], created["postedTime"]);
    assert!(updated["editedTime"].is_string());

    for _ in 0..2 {
        let req = test::TestRequest::delete()
            .uri(&url)
            .insert_header(bearer(&state))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    let resp = test::call_service(&app, test::TestRequest::get().uri(&url).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_update_missing_post_is_not_found() {
    let state = test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::put()
        .uri("/api/posts/999")
        .insert_header(bearer(&state))
        .set_json(post_body("Ghost"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_malformed_body_is_bad_request() {
    let state = test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&state))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"title\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);
}

#[actix_rt::test]
async fn test_cookie_token_authenticates() {
    let state = test_state().await;
    let app = init_app!(state);
    let token = state.tokens.generate_token(ADMIN).unwrap();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .cookie(Cookie::new("jwt_token", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], ADMIN);
}

#[actix_rt::test]
async fn test_bad_token_continues_anonymously_and_clears_cookies() {
    let state = test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/posts")
        .cookie(Cookie::new("jwt_token", "garbage"))
        .cookie(Cookie::new("jwt_authed", "1"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let token_cookie = response_cookie(&resp, "jwt_token").unwrap();
    assert_eq!(token_cookie.max_age(), Some(Duration::ZERO));
    assert_eq!(token_cookie.path(), Some("/api"));
    let authed_cookie = response_cookie(&resp, "jwt_authed").unwrap();
    assert_eq!(authed_cookie.max_age(), Some(Duration::ZERO));
    assert_eq!(authed_cookie.path(), Some("/"));
}

#[actix_rt::test]
async fn test_anonymous_request_without_cookies_sets_none() {
    let state = test_state().await;
    let app = init_app!(state);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/tags").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.response().cookies().count(), 0);
}

#[actix_rt::test]
async fn test_page_outside_api_keeps_auth_cookies() {
    let state = test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/some/page")
        .cookie(Cookie::new("jwt_token", "garbage"))
        .cookie(Cookie::new("jwt_authed", "1"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.response().cookies().count(), 0);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
}

#[actix_rt::test]
async fn test_expired_token_is_rejected() {
    let state = test_state().await;
    let app = init_app!(state);
    let stale = state
        .tokens
        .generate_token_at(ADMIN, Utc::now() - TimeDelta::days(8))
        .unwrap();
    let recent = state
        .tokens
        .generate_token_at(ADMIN, Utc::now() - TimeDelta::days(6))
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {stale}")))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {recent}")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_logout_clears_cookies() {
    let state = test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::post().uri("/api/logout").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::post()
        .uri("/api/logout")
        .insert_header(bearer(&state))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    for name in ["jwt_token", "jwt_authed"] {
        let cookie = response_cookie(&resp, name).unwrap();
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}

#[actix_rt::test]
async fn test_comments() {
    let state = test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&state))
        .set_json(post_body("Open"))
        .to_request();
    let open = location(&test::call_service(&app, req).await);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&state))
        .set_json(json!({ "title": "Closed", "content": "x", "locked": true }))
        .to_request();
    let closed = location(&test::call_service(&app, req).await);

    // anyone may comment on an open post
    let req = test::TestRequest::post()
        .uri(&format!("{open}/comments"))
        .set_json(json!({ "author": "visitor", "content": "first!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let comment_url = location(&resp);
    assert!(comment_url.starts_with(&format!("{open}/comments/")));

    let comment: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri(&comment_url).to_request())
            .await;
    assert_eq!(comment["author"], "visitor");
    assert!(comment["postId"].is_number());

    // nobody may comment on a locked one, admin included
    let req = test::TestRequest::post()
        .uri(&format!("{closed}/comments"))
        .insert_header(bearer(&state))
        .set_json(json!({ "author": "admin", "content": "hm" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::post()
        .uri("/api/posts/9999/comments")
        .set_json(json!({ "author": "a", "content": "b" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    // the comment id under the wrong post
    let comment_id = comment_url.rsplit('/').next().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("{closed}/comments/{comment_id}"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::delete().uri(&comment_url).to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::delete()
        .uri(&comment_url)
        .insert_header(bearer(&state))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    let remaining: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("{open}/comments"))
            .to_request(),
    )
    .await;
    assert_eq!(remaining, json!([]));
}

#[actix_rt::test]
async fn test_tags_and_filters() {
    let state = test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&state))
        .set_json(json!({
            "title": "Kitten pictures",
            "content": "so fluffy",
            "tags": ["cute-animals", "cute-animals", "x", "pics"]
        }))
        .to_request();
    let kitten = location(&test::call_service(&app, req).await);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&state))
        .set_json(json!({ "title": "Lorem", "content": "ipsum", "tags": ["pics"] }))
        .to_request();
    test::call_service(&app, req).await;

    let tags: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("{kitten}/tags"))
            .to_request(),
    )
    .await;
    let names: Vec<_> = tags
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["cute-animals", "pics"]);

    let used: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/tags").to_request())
            .await;
    assert_eq!(used.as_array().unwrap().len(), 2);

    let by_tag: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/posts?tag=cute-animals")
            .to_request(),
    )
    .await;
    assert_eq!(by_tag.as_array().unwrap().len(), 1);
    assert_eq!(by_tag[0]["tags"].as_array().unwrap().len(), 2);

    let by_text: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/posts?query=FLUFFY")
            .to_request(),
    )
    .await;
    assert_eq!(by_text.as_array().unwrap().len(), 1);
    assert_eq!(by_text[0]["title"], "Kitten pictures");

    let all: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/posts?tag=pics").to_request(),
    )
    .await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    // tags omitted on update leave them as they are
    let req = test::TestRequest::put()
        .uri(&kitten)
        .insert_header(bearer(&state))
        .set_json(post_body("Kitten pictures"))
        .to_request();
    test::call_service(&app, req).await;
    let post: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri(&kitten).to_request())
            .await;
    assert_eq!(post["tags"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_unknown_post_tags_and_comments_are_not_found() {
    let state = test_state().await;
    let app = init_app!(state);

    for uri in ["/api/posts/77/tags", "/api/posts/77/comments", "/api/posts/abc"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}
