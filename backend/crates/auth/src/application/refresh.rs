//! Token Refresh Use Case
//!
//! Stateless refresh: the refresh token is self-contained, but the user
//! is re-checked so a suspension or deletion cuts the session short.

use std::sync::Arc;

use kernel::id::UserId;
use platform::token::{TokenError, TokenPair, TokenService};

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_status::UserStatus;
use crate::error::{AuthError, AuthResult};

/// Refresh output
pub struct RefreshOutput {
    pub user: User,
    pub tokens: TokenPair,
}

/// Token refresh use case
pub struct RefreshUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: TokenService,
}

impl<U> RefreshUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, tokens: TokenService) -> Self {
        Self { user_repo, tokens }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<RefreshOutput> {
        let claims = self
            .tokens
            .verify_refresh(refresh_token)
            .map_err(|e| match e {
                TokenError::Expired => AuthError::RefreshTokenExpired,
                TokenError::Invalid(_) | TokenError::WrongUse => AuthError::InvalidRefreshToken,
            })?;

        let user_id = UserId::from_uuid(
            claims
                .user_id()
                .map_err(|_| AuthError::InvalidRefreshToken)?,
        );

        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.status != UserStatus::Active {
            return Err(AuthError::AccountInactive);
        }

        let tokens = self
            .tokens
            .issue_pair(user.id.into_uuid(), user.role.code())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(RefreshOutput { user, tokens })
    }
}
