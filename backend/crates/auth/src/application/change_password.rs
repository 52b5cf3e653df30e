//! Change Password Use Case

use std::sync::Arc;

use platform::password::{ClearTextPassword, hash_password, verify_password};

use crate::application::audit::AuditTrail;
use crate::domain::entity::audit_log::AuditLog;
use crate::domain::entity::user::User;
use crate::domain::repository::{AuditLogRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Change password input
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
    pub client_ip: Option<String>,
}

/// Change password use case
pub struct ChangePasswordUseCase<U, A>
where
    U: UserRepository,
    A: AuditLogRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    audit: AuditTrail<A>,
}

impl<U, A> ChangePasswordUseCase<U, A>
where
    U: UserRepository,
    A: AuditLogRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, audit: AuditTrail<A>) -> Self {
        Self { user_repo, audit }
    }

    /// `user` is the already-authenticated caller from the middleware.
    pub async fn execute(&self, user: &User, input: ChangePasswordInput) -> AuthResult<()> {
        if user.is_oauth_account() {
            return Err(AuthError::OAuthAccount);
        }

        let current = ClearTextPassword::new(input.current_password)
            .map_err(|_| AuthError::CurrentPasswordIncorrect)?;
        let valid = verify_password(&current, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(AuthError::CurrentPasswordIncorrect);
        }

        let new_password = ClearTextPassword::new(input.new_password)?;
        let new_hash = hash_password(&new_password)?;
        self.user_repo.update_password(&user.id, &new_hash).await?;

        self.audit.record(
            AuditLog::new("password_change", "user")
                .actor(user.id)
                .entity(user.id.into_uuid())
                .ip(input.client_ip),
        );

        tracing::info!(user_id = %user.id, "Password changed");

        Ok(())
    }
}
