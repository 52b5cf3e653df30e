//! Domain Entities

pub mod verification;

pub use verification::KycVerification;
