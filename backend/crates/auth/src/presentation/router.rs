//! Auth Router

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::{Router, body::Body, http::Request, middleware::Next};
use platform::rate_limit::{FixedWindowStore, RateLimitConfig};
use std::sync::Arc;

use crate::application::audit::AuditTrail;
use crate::application::config::AuthConfig;
use crate::application::google::IdTokenVerifier;
use crate::domain::repository::{AuditLogRepository, UserRepository};
use crate::infra::google::GoogleJwksVerifier;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, authenticate, rate_limit};

// Per-route fixed-window limits (requests per minute, per client IP).
const REGISTER_LIMIT: (u32, u64) = (5, 60);
const LOGIN_LIMIT: (u32, u64) = (10, 60);
const GOOGLE_LIMIT: (u32, u64) = (10, 60);
const REFRESH_LIMIT: (u32, u64) = (20, 60);

/// Create the Auth router with PostgreSQL repository and the JWKS
/// verifier.
pub fn auth_router(
    repo: PgAuthRepository,
    verifier: GoogleJwksVerifier,
    config: AuthConfig,
    limiter: Arc<FixedWindowStore>,
) -> Router {
    auth_router_generic(repo, verifier, config, limiter)
}

/// Create a generic Auth router for any repository/verifier
/// implementation.
pub fn auth_router_generic<R, V>(
    repo: R,
    verifier: V,
    config: AuthConfig,
    limiter: Arc<FixedWindowStore>,
) -> Router
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
    V: IdTokenVerifier + Send + Sync + 'static,
{
    let repo = Arc::new(repo);
    let tokens = config.token_service();
    let state = AuthAppState {
        repo: Arc::clone(&repo),
        verifier: Arc::new(verifier),
        config: Arc::new(config),
        tokens: tokens.clone(),
        audit: AuditTrail::new(Arc::clone(&repo)),
    };
    let mw_state = AuthMiddlewareState::new(repo, tokens);

    let limited = |(max, secs): (u32, u64)| {
        let limiter = Arc::clone(&limiter);
        from_fn(move |req: Request<Body>, next: Next| {
            rate_limit(
                Arc::clone(&limiter),
                RateLimitConfig::new(max, secs),
                req,
                next,
            )
        })
    };

    Router::new()
        .route(
            "/register",
            post(handlers::register::<R, V>).layer(limited(REGISTER_LIMIT)),
        )
        .route(
            "/login",
            post(handlers::login::<R, V>).layer(limited(LOGIN_LIMIT)),
        )
        .route(
            "/google",
            post(handlers::google::<R, V>).layer(limited(GOOGLE_LIMIT)),
        )
        .route(
            "/refresh",
            post(handlers::refresh::<R, V>).layer(limited(REFRESH_LIMIT)),
        )
        .route(
            "/me",
            get(handlers::me)
                .layer(from_fn_with_state(mw_state.clone(), authenticate::<R>)),
        )
        .route(
            "/logout",
            post(handlers::logout::<R, V>)
                .layer(from_fn_with_state(mw_state.clone(), authenticate::<R>)),
        )
        .route(
            "/change-password",
            post(handlers::change_password::<R, V>)
                .layer(from_fn_with_state(mw_state, authenticate::<R>)),
        )
        .with_state(state)
}
