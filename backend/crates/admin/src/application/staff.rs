//! Create Staff Use Case
//!
//! Admins provision internal accounts with a generated staff id and a
//! temporary password. The plaintext password is returned to the admin
//! exactly once; only its hash is stored.

use std::sync::Arc;

use auth::application::audit::AuditTrail;
use auth::domain::entity::audit_log::AuditLog;
use auth::domain::entity::user::User;
use auth::domain::repository::{AuditLogRepository, UserRepository};
use auth::domain::value_object::email::Email;
use auth::domain::value_object::user_role::UserRole;
use auth::error::AuthError;
use platform::credentials::{generate_staff_id, generate_temp_password};
use platform::password::{ClearTextPassword, hash_password};
use serde_json::json;

use crate::application::users::AdminContext;
use crate::error::{AdminError, AdminResult};

/// Create staff input
pub struct CreateStaffInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role_id: String,
}

/// Create staff output; `temp_password` is shown to the admin once and
/// never persisted in the clear.
#[derive(Debug)]
pub struct CreateStaffOutput {
    pub user: User,
    pub temp_password: String,
}

/// Create staff use case
pub struct CreateStaffUseCase<R>
where
    R: UserRepository + AuditLogRepository + Send + Sync + 'static,
{
    users: Arc<R>,
    audit: AuditTrail<R>,
}

impl<R> CreateStaffUseCase<R>
where
    R: UserRepository + AuditLogRepository + Send + Sync + 'static,
{
    pub fn new(users: Arc<R>, audit: AuditTrail<R>) -> Self {
        Self { users, audit }
    }

    pub async fn execute(
        &self,
        input: CreateStaffInput,
        ctx: AdminContext,
    ) -> AdminResult<CreateStaffOutput> {
        let role = UserRole::from_code(&input.role_id)
            .filter(UserRole::is_provisionable_staff)
            .ok_or(AdminError::InvalidStaffRole)?;

        let first_name = input.first_name.trim().to_string();
        let last_name = input.last_name.trim().to_string();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(AdminError::Validation(
                "First name and last name are required".to_string(),
            ));
        }

        let email = Email::new(&input.email).map_err(AuthError::from)?;
        if self.users.email_exists(&email).await? {
            return Err(AdminError::Auth(AuthError::EmailTaken));
        }

        let temp_password = generate_temp_password();
        let password = ClearTextPassword::new(temp_password.clone())
            .map_err(|e| AdminError::Internal(format!("generated password rejected: {e}")))?;
        let password_hash =
            hash_password(&password).map_err(|e| AdminError::Internal(e.to_string()))?;

        let user = User::new_staff(
            email,
            password_hash,
            first_name,
            last_name,
            input.phone.filter(|p| !p.trim().is_empty()),
            role,
            generate_staff_id(),
        );
        self.users.create(&user).await?;

        self.audit.record(
            AuditLog::new("admin_create_staff", "user")
                .actor(ctx.actor_id)
                .entity(user.id.into_uuid())
                .new_values(json!({
                    "email": user.email.as_str(),
                    "role": user.role.code(),
                    "staff_id": user.staff_id,
                }))
                .ip(ctx.client_ip),
        );

        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            actor_id = %ctx.actor_id,
            "Staff account created"
        );

        Ok(CreateStaffOutput {
            user,
            temp_password,
        })
    }
}
