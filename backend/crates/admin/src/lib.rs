//! Admin Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Property and transaction models, repository traits
//! - `application/` - User administration, staff provisioning, property
//!   moderation, dashboard reporting
//! - `infra/` - PostgreSQL repository
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! All routes are gated on the admin role. User mutations go through
//! the auth crate's `UserRepository`, so account invariants live in one
//! place; property decisions are conditional updates from pending so a
//! listing is decided at most once. The primary admin account is
//! protected from modification and deactivation.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use error::{AdminError, AdminResult};
pub use infra::postgres::PgAdminRepository;
pub use presentation::router::admin_router;

// Convenience re-exports
pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::repository::{
        DashboardStats, PendingProperty, SellerSummary, TransactionEntry, TransactionFilter,
    };
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
