//! Application Layer

pub mod approve;
pub mod queries;
pub mod reject;
pub mod request_docs;

pub use approve::{ApproveVerificationUseCase, ReviewContext};
pub use queries::KycQueries;
pub use reject::RejectVerificationUseCase;
pub use request_docs::{RequestDocumentsInput, RequestDocumentsUseCase};
