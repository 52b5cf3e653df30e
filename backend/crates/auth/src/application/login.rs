//! Login Use Case
//!
//! Email/password authentication. Unknown email and wrong password must
//! be indistinguishable to the client.

use std::sync::Arc;

use platform::password::{ClearTextPassword, verify_password};
use platform::token::{TokenPair, TokenService};
use serde_json::json;

use crate::application::audit::AuditTrail;
use crate::domain::entity::audit_log::AuditLog;
use crate::domain::entity::user::User;
use crate::domain::repository::{AuditLogRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::domain::value_object::user_status::UserStatus;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub client_ip: Option<String>,
}

/// Login output
pub struct LoginOutput {
    pub user: User,
    pub tokens: TokenPair,
}

/// Login use case
pub struct LoginUseCase<U, A>
where
    U: UserRepository,
    A: AuditLogRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    audit: AuditTrail<A>,
    tokens: TokenService,
}

impl<U, A> LoginUseCase<U, A>
where
    U: UserRepository,
    A: AuditLogRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, audit: AuditTrail<A>, tokens: TokenService) -> Self {
        Self {
            user_repo,
            audit,
            tokens,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let mut user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        match user.status {
            UserStatus::Active => {}
            UserStatus::Suspended => return Err(AuthError::AccountSuspended),
            UserStatus::Banned => return Err(AuthError::AccountBanned),
        }

        // An OAuth sentinel is not a valid hash, so verify_password returns
        // false for it and provider accounts cannot password-login.
        let password =
            ClearTextPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;
        let valid = verify_password(&password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        self.user_repo.record_login(&user.id).await?;
        user.last_login_at = Some(chrono::Utc::now());

        self.audit.record(
            AuditLog::new("user_login", "user")
                .actor(user.id)
                .entity(user.id.into_uuid())
                .new_values(json!({ "email": user.email.as_str() }))
                .ip(input.client_ip),
        );

        let tokens = self
            .tokens
            .issue_pair(user.id.into_uuid(), user.role.code())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutput { user, tokens })
    }
}
