//! Value Objects

pub mod verification_status;

pub use verification_status::VerificationStatus;
