//! Presentation Layer

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::KycAppState;
pub use router::{kyc_router, kyc_router_generic};
