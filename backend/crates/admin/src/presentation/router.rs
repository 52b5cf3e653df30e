//! Admin Router
//!
//! Every route requires a bearer token and the admin role.

use std::sync::Arc;

use auth::application::audit::{AuditTrail, Notifier};
use auth::application::config::AuthConfig;
use auth::domain::repository::{AuditLogRepository, NotificationRepository, UserRepository};
use auth::infra::postgres::PgAuthRepository;
use auth::models::UserRole;
use auth::presentation::middleware::{AuthMiddlewareState, authenticate, role_guard};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post, put};
use axum::{Router, body::Body, http::Request, middleware::Next};

use crate::domain::repository::{
    DashboardRepository, PropertyRepository, TransactionRepository,
};
use crate::infra::postgres::PgAdminRepository;
use crate::presentation::handlers::{self, AdminAppState};

const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

/// Create the Admin router with PostgreSQL repositories.
pub fn admin_router(
    repo: PgAdminRepository,
    users: PgAuthRepository,
    config: AuthConfig,
) -> Router {
    admin_router_generic(repo, users, config)
}

/// Create a generic Admin router for any repository implementation.
pub fn admin_router_generic<P, R>(repo: P, users: R, config: AuthConfig) -> Router
where
    P: PropertyRepository + TransactionRepository + DashboardRepository + Send + Sync + 'static,
    R: UserRepository
        + AuditLogRepository
        + NotificationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let users = Arc::new(users);
    let tokens = config.token_service();
    let state = AdminAppState {
        repo: Arc::new(repo),
        users: Arc::clone(&users),
        audit: AuditTrail::new(Arc::clone(&users)),
        notifier: Notifier::new(Arc::clone(&users)),
        config: Arc::new(config),
    };
    let mw_state = AuthMiddlewareState::new(users, tokens);

    Router::new()
        .route("/dashboard", get(handlers::dashboard::<P, R>))
        .route("/users", get(handlers::list_users::<P, R>))
        .route("/users", post(handlers::create_staff::<P, R>))
        .route("/users/{id}", get(handlers::get_user::<P, R>))
        .route("/users/{id}", put(handlers::update_user::<P, R>))
        .route("/users/{id}", delete(handlers::deactivate_user::<P, R>))
        .route(
            "/properties/pending",
            get(handlers::pending_properties::<P, R>),
        )
        .route(
            "/properties/{id}/status",
            put(handlers::update_property_status::<P, R>),
        )
        .route("/transactions", get(handlers::transactions::<P, R>))
        .route("/audit-logs", get(handlers::audit_logs::<P, R>))
        .layer(from_fn(|req: Request<Body>, next: Next| {
            role_guard(ADMIN_ONLY, req, next)
        }))
        .layer(from_fn_with_state(mw_state, authenticate::<R>))
        .with_state(state)
}
