//! Admin Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Admin-specific result type alias
pub type AdminResult<T> = Result<T, AdminError>;

/// Admin-specific error variants
#[derive(Debug, Error)]
pub enum AdminError {
    /// No user with that id
    #[error("User not found")]
    UserNotFound,

    /// No property with that id
    #[error("Property not found")]
    PropertyNotFound,

    /// Attempted to modify or deactivate the primary admin account
    #[error("The primary admin account cannot be modified")]
    PrimaryAdminProtected,

    /// Staff provisioning with a non-staff role
    #[error("Invalid role. Staff accounts must be staff or operations_manager.")]
    InvalidStaffRole,

    /// Property moderation with a status outside active/rejected
    #[error("Invalid status. Must be active or rejected.")]
    InvalidPropertyStatus,

    /// Moderation attempted on a property that already left pending
    #[error("This property has already been reviewed")]
    PropertyAlreadyDecided,

    /// Input validation failure
    #[error("{0}")]
    Validation(String),

    /// Errors surfaced by the auth crate (user mutations, middleware)
    #[error(transparent)]
    Auth(#[from] auth::AuthError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        use AdminError::*;
        match self {
            UserNotFound | PropertyNotFound => ErrorKind::NotFound,
            PrimaryAdminProtected => ErrorKind::Forbidden,
            InvalidStaffRole | InvalidPropertyStatus | PropertyAlreadyDecided | Validation(_) => {
                ErrorKind::BadRequest
            }
            Auth(e) => e.kind(),
            Database(_) | Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            AdminError::Auth(e) => e.to_app_error(),
            AdminError::Database(_) | AdminError::Internal(_) => {
                AppError::new(self.kind(), "Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            AdminError::Database(e) => {
                tracing::error!(error = %e, "Admin database error");
            }
            AdminError::Internal(msg) => {
                tracing::error!(message = %msg, "Admin internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Admin error");
            }
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        match self {
            // Let the auth error keep its own logging and headers.
            AdminError::Auth(e) => e.into_response(),
            other => {
                other.log();
                other.to_app_error().into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AdminError::UserNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(AdminError::PrimaryAdminProtected.kind(), ErrorKind::Forbidden);
        assert_eq!(AdminError::InvalidStaffRole.kind(), ErrorKind::BadRequest);
        assert_eq!(
            AdminError::PropertyAlreadyDecided.kind(),
            ErrorKind::BadRequest
        );
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let err = AdminError::Internal("connection pool exhausted".to_string());
        let body = err.to_app_error().to_body();
        assert_eq!(body["error"], serde_json::json!("Internal server error"));
    }
}
