//! KYC Router
//!
//! Every route requires a bearer token and a reviewer role. The review
//! surface is only reachable by admins and operations managers.

use std::sync::Arc;

use auth::application::audit::{AuditTrail, Notifier};
use auth::domain::repository::{AuditLogRepository, NotificationRepository, UserRepository};
use auth::infra::postgres::PgAuthRepository;
use auth::models::UserRole;
use auth::presentation::middleware::{AuthMiddlewareState, authenticate, role_guard};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::{Router, body::Body, http::Request, middleware::Next};
use platform::token::TokenService;

use crate::domain::repository::KycVerificationRepository;
use crate::infra::postgres::PgKycRepository;
use crate::presentation::handlers::{self, KycAppState};

const REVIEW_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::OperationsManager];

/// Create the KYC router with PostgreSQL repositories.
pub fn kyc_router(
    kyc_repo: PgKycRepository,
    users: PgAuthRepository,
    tokens: TokenService,
) -> Router {
    kyc_router_generic(kyc_repo, users, tokens)
}

/// Create a generic KYC router for any repository implementation.
pub fn kyc_router_generic<K, R>(kyc_repo: K, users: R, tokens: TokenService) -> Router
where
    K: KycVerificationRepository + Send + Sync + 'static,
    R: UserRepository
        + AuditLogRepository
        + NotificationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let kyc_repo = Arc::new(kyc_repo);
    let users = Arc::new(users);
    let state = KycAppState {
        kyc_repo,
        users: Arc::clone(&users),
        audit: AuditTrail::new(Arc::clone(&users)),
        notifier: Notifier::new(Arc::clone(&users)),
    };
    let mw_state = AuthMiddlewareState::new(users, tokens);

    Router::new()
        .route("/queue", get(handlers::queue::<K, R>))
        .route("/stats", get(handlers::stats::<K, R>))
        .route("/{id}", get(handlers::detail::<K, R>))
        .route("/{id}/approve", post(handlers::approve::<K, R>))
        .route("/{id}/reject", post(handlers::reject::<K, R>))
        .route("/{id}/request-docs", post(handlers::request_docs::<K, R>))
        .layer(from_fn(|req: Request<Body>, next: Next| {
            role_guard(REVIEW_ROLES, req, next)
        }))
        .layer(from_fn_with_state(mw_state, authenticate::<R>))
        .with_state(state)
}
