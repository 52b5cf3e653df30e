//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - JWT access/refresh token issuance and verification
//! - Rate limiting infrastructure
//! - Client IP extraction
//! - Generated credentials for staff provisioning

pub mod client;
pub mod credentials;
pub mod password;
pub mod rate_limit;
pub mod token;
