//! KYC Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// KYC-specific result type alias
pub type KycResult<T> = Result<T, KycError>;

/// KYC-specific error variants
#[derive(Debug, Error)]
pub enum KycError {
    /// No verification record with that id
    #[error("Verification not found")]
    VerificationNotFound,

    /// Approve/reject attempted on a terminal record
    #[error("This verification has already been processed")]
    AlreadyProcessed,

    /// Reject without a reason
    #[error("Rejection reason is required")]
    MissingReason,

    /// Document request without a message
    #[error("Message is required")]
    MissingMessage,

    /// Unknown status code in the queue filter
    #[error("Invalid status filter")]
    InvalidStatusFilter,

    /// Errors surfaced by the auth crate (user cascade, middleware)
    #[error(transparent)]
    Auth(#[from] auth::AuthError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl KycError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        use KycError::*;
        match self {
            VerificationNotFound => ErrorKind::NotFound,
            AlreadyProcessed | MissingReason | MissingMessage | InvalidStatusFilter => {
                ErrorKind::BadRequest
            }
            Auth(e) => e.kind(),
            Database(_) | Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            KycError::Auth(e) => e.to_app_error(),
            KycError::Database(_) | KycError::Internal(_) => {
                AppError::new(self.kind(), "Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            KycError::Database(e) => {
                tracing::error!(error = %e, "KYC database error");
            }
            KycError::Internal(msg) => {
                tracing::error!(message = %msg, "KYC internal error");
            }
            _ => {
                tracing::debug!(error = %self, "KYC error");
            }
        }
    }
}

impl IntoResponse for KycError {
    fn into_response(self) -> Response {
        match self {
            // Let the auth error keep its own logging and headers.
            KycError::Auth(e) => e.into_response(),
            other => {
                other.log();
                other.to_app_error().into_response()
            }
        }
    }
}
