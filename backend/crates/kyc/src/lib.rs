//! KYC (Know Your Customer) Review Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Verification entity, statuses, repository traits
//! - `application/` - Review use cases (approve, reject, request docs)
//!   and dashboard queries
//! - `infra/` - PostgreSQL repository
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Submissions are created outside this service; this crate covers the
//! review side: the queue, decisions, and their cascade onto the user
//! account. Approve and reject are conditional updates so concurrent
//! reviewers cannot double-process a record; requesting documents
//! reopens a record from any state, which is also the appeal path.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use error::{KycError, KycResult};
pub use infra::postgres::PgKycRepository;
pub use presentation::router::kyc_router;

// Convenience re-exports
pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::repository::{
        DocumentRequest, KycStats, QueueEntry, UserSummary, VerificationDetail,
    };
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
