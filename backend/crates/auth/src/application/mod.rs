//! Application Layer
//!
//! Use cases orchestrating domain entities and repositories.

pub mod audit;
pub mod change_password;
pub mod config;
pub mod google;
pub mod login;
pub mod refresh;
pub mod register;

pub use audit::{AuditTrail, Notifier};
pub use config::AuthConfig;
