//! Auth Middleware
//!
//! Bearer-token authentication, role gating, and per-IP rate limiting.
//! The user is reloaded from the database on every authenticated request,
//! so suspensions and bans take effect immediately regardless of how much
//! lifetime the token has left.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{ConnectInfo, FromRequestParts, State};
use axum::http::{HeaderMap, Request, request::Parts};
use axum::middleware::Next;
use axum::response::Response;
use kernel::id::UserId;
use platform::client::{client_key, extract_client_ip};
use platform::rate_limit::{FixedWindowStore, RateLimitConfig, RateLimitStore, SystemClock};
use platform::token::{TokenError, TokenService};

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::domain::value_object::user_status::UserStatus;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: TokenService,
}

impl<R> AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, tokens: TokenService) -> Self {
        Self { repo, tokens }
    }
}

/// The authenticated caller, attached as a request extension.
/// Handlers must never serialize the inner entity directly; responses go
/// through `UserResponse`, which drops the password hash.
#[derive(Clone)]
pub struct CurrentUser(pub Arc<User>);

/// Client IP extractor: X-Forwarded-For aware, falls back to the peer
/// address when the service is not behind a proxy.
pub struct ClientIp(pub Option<String>);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());
        Ok(Self(
            extract_client_ip(&parts.headers, peer).map(|ip| ip.to_string()),
        ))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn resolve_user<R>(state: &AuthMiddlewareState<R>, headers: &HeaderMap) -> Result<User, AuthError>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;

    let claims = state.tokens.verify_access(token).map_err(|e| match e {
        TokenError::Expired => AuthError::TokenExpired,
        TokenError::Invalid(_) | TokenError::WrongUse => AuthError::InvalidToken,
    })?;

    let user_id = UserId::from_uuid(claims.user_id().map_err(|_| AuthError::InvalidToken)?);
    let user = state
        .repo
        .find_by_id(&user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    match user.status {
        UserStatus::Active => Ok(user),
        UserStatus::Suspended => Err(AuthError::AccountSuspended),
        UserStatus::Banned => Err(AuthError::AccountBanned),
    }
}

/// Middleware requiring a valid access token; attaches [`CurrentUser`].
pub async fn authenticate<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = resolve_user(&state, req.headers()).await?;
    req.extensions_mut().insert(CurrentUser(Arc::new(user)));
    Ok(next.run(req).await)
}

/// Like [`authenticate`], but failures leave the request anonymous
/// instead of rejecting it.
pub async fn optional_authenticate<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    if let Ok(user) = resolve_user(&state, req.headers()).await {
        req.extensions_mut().insert(CurrentUser(Arc::new(user)));
    }
    next.run(req).await
}

/// Role gate; must run after [`authenticate`]. Rejects with a payload
/// naming the required roles and the caller's actual role.
pub async fn role_guard(
    allowed: &'static [UserRole],
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let current = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AuthError::MissingToken)?
        .0
        .role;

    if !allowed.contains(&current) {
        return Err(AuthError::RoleDenied {
            required: allowed,
            current,
        });
    }

    Ok(next.run(req).await)
}

/// Per-IP fixed-window rate limit for the public auth endpoints.
pub async fn rate_limit(
    store: Arc<FixedWindowStore<SystemClock>>,
    config: RateLimitConfig,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let key = client_key(req.headers(), peer);

    let result = store.check_and_increment(&key, &config).await;
    if !result.allowed {
        let now_ms = chrono::Utc::now().timestamp_millis();
        return Err(AuthError::RateLimited {
            retry_after_secs: result.retry_after_secs(now_ms),
        });
    }

    Ok(next.run(req).await)
}
