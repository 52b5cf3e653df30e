//! Infrastructure Layer
//!
//! Database implementations and external service adapters.

pub mod google;
pub mod postgres;

pub use google::GoogleJwksVerifier;
pub use postgres::PgAuthRepository;
