//! Value Objects

pub mod email;
pub mod kyc;
pub mod user_role;
pub mod user_status;

pub use email::Email;
pub use kyc::{KycLevel, KycStatus};
pub use user_role::UserRole;
pub use user_status::UserStatus;
