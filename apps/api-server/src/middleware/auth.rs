//! Authentication middleware and extractors.
//!
//! [`JwtAuthentication`] resolves the caller on every `/api/` request and
//! stores an [`Identity`] in the request extensions. Handlers state their own
//! requirements through the [`Identity`] and [`AdminIdentity`] extractors.

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, http::header};

use wordless_core::ports::{AuthError, CredentialStore, Principal, Role, TokenService};

use crate::middleware::error::AppError;
use crate::state::{AppState, CookieSettings};

/// httpOnly cookie carrying the token.
pub const TOKEN_COOKIE: &str = "jwt_token";
/// Script-readable marker telling the client it is logged in.
pub const AUTHED_COOKIE: &str = "jwt_authed";

const TOKEN_COOKIE_PATH: &str = "/api";
const AUTHED_COOKIE_PATH: &str = "/";
const BEARER_PREFIX: &str = "Bearer ";

/// The authenticated caller of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub roles: Vec<Role>,
}

impl Identity {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

impl From<Principal> for Identity {
    fn from(principal: Principal) -> Self {
        Self {
            username: principal.username,
            roles: principal.roles,
        }
    }
}

/// Requires an authenticated caller, else 401.
impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req
            .extensions()
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| AppError::from(AuthError::MissingAuth));

        ready(identity)
    }
}

/// Requires an authenticated admin: 401 when anonymous, 403 without the role.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Identity);

impl FromRequest for AdminIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let result = Identity::from_request(req, payload)
            .into_inner()
            .and_then(|identity| {
                if identity.has_role(Role::Admin) {
                    Ok(AdminIdentity(identity))
                } else {
                    tracing::warn!(username = %identity.username, "Admin role required");
                    Err(AppError::from(AuthError::InsufficientPermissions))
                }
            });

        ready(result)
    }
}

/// Cookie carrying a freshly issued token.
///
/// Both auth cookies are `SameSite=Strict`, so a cross-site form or fetch
/// never carries them into an admin mutation.
pub fn token_cookie(token: &str, settings: &CookieSettings) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, token.to_owned())
        .path(TOKEN_COOKIE_PATH)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(settings.secure)
        .max_age(Duration::seconds(settings.max_age_seconds))
        .finish()
}

/// The `jwt_authed=1` marker cookie.
pub fn authed_cookie(settings: &CookieSettings) -> Cookie<'static> {
    Cookie::build(AUTHED_COOKIE, "1")
        .path(AUTHED_COOKIE_PATH)
        .same_site(SameSite::Strict)
        .secure(settings.secure)
        .max_age(Duration::seconds(settings.max_age_seconds))
        .finish()
}

fn removal_cookie(name: &'static str, path: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build(name, "").path(path).finish();
    cookie.make_removal();
    cookie
}

/// Removal cookies for both auth cookies.
pub fn auth_removal_cookies() -> [Cookie<'static>; 2] {
    [
        removal_cookie(TOKEN_COOKIE, TOKEN_COOKIE_PATH),
        removal_cookie(AUTHED_COOKIE, AUTHED_COOKIE_PATH),
    ]
}

/// Expire whichever auth cookies `req` carried, unless `res` already sets them.
pub fn expire_auth_cookies<B>(req: &HttpRequest, res: &mut HttpResponse<B>) {
    for cookie in auth_removal_cookies() {
        let carried = req.cookie(cookie.name()).is_some();
        let already_set = res.cookies().any(|c| c.name() == cookie.name());
        if !carried || already_set {
            continue;
        }
        if let Err(e) = res.add_cookie(&cookie) {
            tracing::error!(cookie = cookie.name(), error = %e, "Failed to expire auth cookie");
        }
    }
}

/// Bearer header first, then the token cookie.
fn request_token(req: &ServiceRequest) -> Option<String> {
    let from_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned);

    from_header.or_else(|| req.cookie(TOKEN_COOKIE).map(|c| c.value().to_owned()))
}

async fn resolve_identity(
    tokens: &dyn TokenService,
    credentials: &dyn CredentialStore,
    token: Option<String>,
) -> Result<Identity, AuthError> {
    let token = token.ok_or(AuthError::MissingAuth)?;
    let claims = tokens.validate_token(&token)?;

    let principal = credentials
        .find_principal(&claims.subject)
        .await?
        .ok_or(AuthError::UnknownSubject(claims.subject))?;

    Ok(Identity::from(principal))
}

/// Token validation middleware factory.
pub struct JwtAuthentication {
    tokens: Arc<dyn TokenService>,
    credentials: Arc<dyn CredentialStore>,
}

impl JwtAuthentication {
    pub fn new(state: &AppState) -> Self {
        Self {
            tokens: state.tokens.clone(),
            credentials: state.credentials.clone(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = JwtAuthenticationService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthenticationService {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
            credentials: self.credentials.clone(),
        }))
    }
}

pub struct JwtAuthenticationService<S> {
    service: Rc<S>,
    tokens: Arc<dyn TokenService>,
    credentials: Arc<dyn CredentialStore>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthenticationService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let tokens = self.tokens.clone();
        let credentials = self.credentials.clone();

        Box::pin(async move {
            // The token cookie is scoped to /api, so nothing else can be validated.
            if !req.path().starts_with("/api/") {
                return service.call(req).await;
            }

            let token = request_token(&req);
            match resolve_identity(tokens.as_ref(), credentials.as_ref(), token).await {
                Ok(identity) => {
                    tracing::debug!(username = %identity.username, "Request authenticated");
                    req.extensions_mut().insert(identity);
                    service.call(req).await
                }
                Err(e) => {
                    if !matches!(e, AuthError::MissingAuth) {
                        tracing::warn!(error = %e, path = %req.path(), "Rejected auth token");
                    }

                    let mut res = service.call(req).await?;
                    let request = res.request().clone();
                    expire_auth_cookies(&request, res.response_mut());
                    Ok(res)
                }
            }
        })
    }
}
