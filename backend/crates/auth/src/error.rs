//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Client-facing wording matters here:
//! the frontend branches on exact messages and on the `TOKEN_EXPIRED` code.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::{PasswordHashError, PasswordPolicyError};
use serde_json::json;
use thiserror::Error;

use crate::domain::value_object::user_role::UserRole;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email already registered (unique email column)
    #[error("Email already registered")]
    EmailTaken,

    /// Role not allowed in this flow; message varies by flow
    #[error("{0}")]
    InvalidRole(&'static str),

    /// Password failed policy validation
    #[error("{0}")]
    PasswordPolicy(#[from] PasswordPolicyError),

    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Suspended account attempting to sign in or act
    #[error("Account is suspended. Please contact support.")]
    AccountSuspended,

    /// Banned account attempting to sign in or act
    #[error("Account is banned.")]
    AccountBanned,

    /// Non-active account at the refresh endpoint
    #[error("Account is not active")]
    AccountInactive,

    /// No bearer token on a protected route
    #[error("Access token required")]
    MissingToken,

    /// Malformed/bad-signature/wrong-use access token
    #[error("Invalid token")]
    InvalidToken,

    /// Access token expired; carries code TOKEN_EXPIRED so clients refresh
    #[error("Token expired")]
    TokenExpired,

    /// Refresh token past its 30-day lifetime
    #[error("Refresh token expired. Please login again.")]
    RefreshTokenExpired,

    /// Malformed refresh token, or an access token presented for refresh
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// Token subject no longer resolves to a user
    #[error("User not found")]
    UserNotFound,

    /// Wrong current password on a password change
    #[error("Current password is incorrect")]
    CurrentPasswordIncorrect,

    /// Password operations on a Google sign-in account
    #[error("Cannot change password for Google OAuth accounts")]
    OAuthAccount,

    /// Authenticated but the route needs a different role
    #[error("Access denied. Insufficient permissions.")]
    RoleDenied {
        required: &'static [UserRole],
        current: UserRole,
    },

    /// Fixed-window rate limit tripped
    #[error("Too many requests. Please try again later.")]
    RateLimited { retry_after_secs: i64 },

    /// Google ID token failed verification
    #[error("Invalid Google token")]
    IdentityProvider(String),

    /// Request-shape validation failure
    #[error("{0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        use AuthError::*;
        match self {
            EmailTaken
            | InvalidRole(_)
            | PasswordPolicy(_)
            | InvalidRefreshToken
            | OAuthAccount
            | Validation(_) => ErrorKind::BadRequest,
            InvalidCredentials
            | MissingToken
            | InvalidToken
            | TokenExpired
            | RefreshTokenExpired
            | UserNotFound
            | CurrentPasswordIncorrect
            | IdentityProvider(_) => ErrorKind::Unauthorized,
            AccountSuspended | AccountBanned | AccountInactive | RoleDenied { .. } => {
                ErrorKind::Forbidden
            }
            RateLimited { .. } => ErrorKind::TooManyRequests,
            Database(_) | Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError. Server-side errors get a generic client message;
    /// the detail stays in the log.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::TokenExpired => {
                AppError::new(self.kind(), self.to_string()).with_code("TOKEN_EXPIRED")
            }
            AuthError::RoleDenied { required, current } => {
                let required: Vec<&str> = required.iter().map(|r| r.code()).collect();
                AppError::new(self.kind(), self.to_string()).with_details(json!({
                    "required": required,
                    "current": current.code(),
                }))
            }
            AuthError::RateLimited { retry_after_secs } => {
                AppError::new(self.kind(), self.to_string())
                    .with_details(json!({ "retry_after": retry_after_secs }))
            }
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::new(self.kind(), "Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::IdentityProvider(detail) => {
                tracing::warn!(detail = %detail, "Google token verification failed");
            }
            AuthError::RateLimited { retry_after_secs } => {
                tracing::warn!(retry_after_secs, "Rate limit exceeded");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        let retry_after = match &self {
            AuthError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        };
        let mut response = self.to_app_error().into_response();
        if let Some(secs) = retry_after {
            if let Ok(value) = secs.to_string().parse() {
                response.headers_mut().insert(axum::http::header::RETRY_AFTER, value);
            }
        }
        response
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            // Email/value-object validation surfaces as a 400 with its
            // own message; anything else routes through Internal.
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AuthError::EmailTaken.kind(), ErrorKind::BadRequest);
        assert_eq!(AuthError::InvalidCredentials.kind(), ErrorKind::Unauthorized);
        assert_eq!(AuthError::AccountSuspended.kind(), ErrorKind::Forbidden);
        assert_eq!(AuthError::InvalidRefreshToken.kind(), ErrorKind::BadRequest);
        assert_eq!(
            AuthError::RateLimited { retry_after_secs: 3 }.kind(),
            ErrorKind::TooManyRequests
        );
    }

    #[test]
    fn test_token_expired_carries_code() {
        let body = AuthError::TokenExpired.to_app_error().to_body();
        assert_eq!(body["error"], json!("Token expired"));
        assert_eq!(body["code"], json!("TOKEN_EXPIRED"));
    }

    #[test]
    fn test_role_denied_payload() {
        let err = AuthError::RoleDenied {
            required: &[UserRole::Admin, UserRole::OperationsManager],
            current: UserRole::Investor,
        };
        let body = err.to_app_error().to_body();
        assert_eq!(body["required"], json!(["admin", "operations_manager"]));
        assert_eq!(body["current"], json!("investor"));
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let err = AuthError::Internal("argon2 blew up".to_string());
        let body = err.to_app_error().to_body();
        assert_eq!(body["error"], json!("Internal server error"));
    }
}
