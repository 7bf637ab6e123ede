//! Authentication handlers.

use actix_web::{Either, HttpRequest, HttpResponse, ResponseError, http::header, web};

use wordless_core::ports::AuthError;
use wordless_shared::dto::{LoginRequest, PrincipalResponse};

use crate::middleware::auth::{
    AdminIdentity, Identity, auth_removal_cookies, authed_cookie, expire_auth_cookies,
    token_cookie,
};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn principal_response(identity: &Identity) -> PrincipalResponse {
    PrincipalResponse {
        username: identity.username.clone(),
        roles: identity
            .roles
            .iter()
            .map(|role| role.as_str().to_string())
            .collect(),
    }
}

/// POST /api/auth - JSON or form-encoded credentials.
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: Either<web::Json<LoginRequest>, web::Form<LoginRequest>>,
) -> AppResult<HttpResponse> {
    let credentials = match body {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };
    tracing::debug!(username = %credentials.username, "Login attempt");

    let principal = match state
        .credentials
        .authenticate(&credentials.username, &credentials.password)
        .await
    {
        Ok(principal) => principal,
        Err(AuthError::InvalidCredentials) => {
            let mut res = AppError::from(AuthError::InvalidCredentials).error_response();
            expire_auth_cookies(&req, &mut res);
            return Ok(res);
        }
        Err(e) => return Err(e.into()),
    };

    let token = state.tokens.generate_token(&principal.username)?;
    let identity = Identity::from(principal);
    tracing::info!(username = %identity.username, "Admin logged in");

    Ok(HttpResponse::Ok()
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .cookie(token_cookie(&token, &state.cookies))
        .cookie(authed_cookie(&state.cookies))
        .json(principal_response(&identity)))
}

/// POST /api/logout
pub async fn logout(AdminIdentity(identity): AdminIdentity) -> HttpResponse {
    tracing::info!(username = %identity.username, "Admin logged out");

    let mut res = HttpResponse::Ok();
    for cookie in auth_removal_cookies() {
        res.cookie(cookie);
    }
    res.finish()
}

/// GET /api/auth/me
pub async fn me(AdminIdentity(identity): AdminIdentity) -> HttpResponse {
    HttpResponse::Ok().json(principal_response(&identity))
}
