//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations, Google token verification
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Features
//! - Email/password registration for investor and seller accounts
//! - Google sign-in with server-side ID token verification (JWKS)
//! - Stateless JWT access/refresh token pairs
//! - Role-based access (admin, operations manager, staff, investor,
//!   seller, appointment setter)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Access and refresh tokens separated by a `token_use` claim
//! - Middleware reloads the user on every request, so suspensions and
//!   bans take effect immediately regardless of token lifetime
//! - Per-IP fixed-window rate limits on the public auth endpoints

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
