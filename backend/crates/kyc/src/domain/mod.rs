//! Domain Layer

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::verification::KycVerification;
pub use repository::KycVerificationRepository;
pub use value_object::verification_status::VerificationStatus;
