//! Register Use Case
//!
//! Public self-registration for investor and seller accounts.

use std::sync::Arc;

use platform::password::{ClearTextPassword, hash_password};
use platform::token::{TokenPair, TokenService};
use serde_json::json;

use crate::application::audit::AuditTrail;
use crate::domain::entity::audit_log::AuditLog;
use crate::domain::entity::user::User;
use crate::domain::repository::{AuditLogRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role_id: String,
    pub client_ip: Option<String>,
}

/// Register output
pub struct RegisterOutput {
    pub user: User,
    pub tokens: TokenPair,
}

/// Register use case
pub struct RegisterUseCase<U, A>
where
    U: UserRepository,
    A: AuditLogRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    audit: AuditTrail<A>,
    tokens: TokenService,
}

impl<U, A> RegisterUseCase<U, A>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let role = UserRole::from_code(&input.role_id)
            .filter(UserRole::can_self_register)
            .ok_or(AuthError::InvalidRole(
                "Invalid role. Only investor and seller accounts can register.",
            ))?;

        let first_name = input.first_name.trim().to_string();
        let last_name = input.last_name.trim().to_string();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(AuthError::Validation(
                "First name and last name are required".to_string(),
            ));
        }

        let email = Email::new(&input.email)?;
        if self.user_repo.email_exists(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password = ClearTextPassword::new(input.password)?;
        let password_hash = hash_password(&password)?;

        let user = User::new_registered(
            email,
            password_hash,
            first_name,
            last_name,
            input.phone.filter(|p| !p.trim().is_empty()),
            role,
        );
        self.user_repo.create(&user).await?;

        self.audit.record(
            AuditLog::new("user_register", "user")
                .actor(user.id)
                .entity(user.id.into_uuid())
                .new_values(json!({
                    "email": user.email.as_str(),
                    "role": user.role.code(),
                }))
                .ip(input.client_ip),
        );

        let tokens = self
            .tokens
            .issue_pair(user.id.into_uuid(), user.role.code())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");

        Ok(RegisterOutput { user, tokens })
    }
}
