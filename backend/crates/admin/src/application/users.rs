//! User Administration Use Cases
//!
//! Listing, inspection, partial updates, and deactivation. The primary
//! admin account (config `PRIMARY_ADMIN_EMAIL`) is protected: nobody
//! else may modify it, and nobody may deactivate it, that account
//! included. Accounts are never deleted; deactivation flips status.

use std::sync::Arc;

use auth::application::audit::AuditTrail;
use auth::application::config::AuthConfig;
use auth::domain::entity::audit_log::AuditLog;
use auth::domain::entity::user::User;
use auth::domain::repository::{AuditLogRepository, UserListFilter, UserRepository};
use chrono::Utc;
use kernel::id::UserId;
use kernel::page::{PageMeta, PageQuery};
use serde_json::json;

use crate::error::{AdminError, AdminResult};

/// Who is acting, and from where.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub actor_id: UserId,
    pub client_ip: Option<String>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Default)]
pub struct UpdateUserInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

/// User administration use case
pub struct UserAdministration<R>
where
    R: UserRepository + AuditLogRepository + Send + Sync + 'static,
{
    users: Arc<R>,
    audit: AuditTrail<R>,
    config: Arc<AuthConfig>,
}

impl<R> UserAdministration<R>
where
    R: UserRepository + AuditLogRepository + Send + Sync + 'static,
{
    pub fn new(users: Arc<R>, audit: AuditTrail<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            users,
            audit,
            config,
        }
    }

    /// Filtered, paginated user listing.
    pub async fn list(
        &self,
        role: Option<&str>,
        status: Option<&str>,
        search: Option<String>,
        page: &PageQuery,
    ) -> AdminResult<(Vec<User>, PageMeta)> {
        let filter = UserListFilter {
            role: parse_filter(role, auth::models::UserRole::from_code, "role")?,
            status: parse_filter(status, auth::models::UserStatus::from_code, "status")?,
            search: search.filter(|s| !s.trim().is_empty()),
        };

        let (users, total) = UserRepository::list(&*self.users, &filter, page).await?;
        Ok((users, PageMeta::new(page, total)))
    }

    pub async fn get(&self, id: &UserId) -> AdminResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AdminError::UserNotFound)
    }

    /// Merge a partial update into the account. Only the primary admin
    /// may modify their own account.
    pub async fn update(
        &self,
        id: &UserId,
        input: UpdateUserInput,
        ctx: AdminContext,
    ) -> AdminResult<User> {
        let mut user = self.get(id).await?;

        if self.config.is_primary_admin(&user.email) && ctx.actor_id != user.id {
            return Err(AdminError::PrimaryAdminProtected);
        }

        let old = snapshot(&user);

        if let Some(first_name) = input.first_name.map(|s| s.trim().to_string()) {
            if first_name.is_empty() {
                return Err(AdminError::Validation("First name cannot be empty".to_string()));
            }
            user.first_name = first_name;
        }
        if let Some(last_name) = input.last_name.map(|s| s.trim().to_string()) {
            if last_name.is_empty() {
                return Err(AdminError::Validation("Last name cannot be empty".to_string()));
            }
            user.last_name = last_name;
        }
        if let Some(phone) = input.phone {
            user.phone = Some(phone).filter(|p| !p.trim().is_empty());
        }
        if let Some(role) = input.role {
            user.role = auth::models::UserRole::from_code(&role)
                .ok_or_else(|| AdminError::Validation("Invalid role".to_string()))?;
        }
        if let Some(status) = input.status {
            user.status = auth::models::UserStatus::from_code(&status)
                .ok_or_else(|| AdminError::Validation("Invalid status".to_string()))?;
        }
        user.updated_at = Utc::now();

        self.users.update(&user).await?;

        self.audit.record(
            AuditLog::new("admin_update_user", "user")
                .actor(ctx.actor_id)
                .entity(user.id.into_uuid())
                .old_values(old)
                .new_values(snapshot(&user))
                .ip(ctx.client_ip),
        );

        tracing::info!(user_id = %user.id, actor_id = %ctx.actor_id, "User updated by admin");

        Ok(user)
    }

    /// Suspend an account. The primary admin can never be deactivated.
    pub async fn deactivate(&self, id: &UserId, ctx: AdminContext) -> AdminResult<()> {
        let user = self.get(id).await?;

        if self.config.is_primary_admin(&user.email) {
            return Err(AdminError::PrimaryAdminProtected);
        }

        self.users
            .set_status(id, auth::models::UserStatus::Suspended)
            .await?;

        self.audit.record(
            AuditLog::new("admin_deactivate_user", "user")
                .actor(ctx.actor_id)
                .entity(user.id.into_uuid())
                .old_values(json!({ "status": user.status.code() }))
                .new_values(json!({ "status": auth::models::UserStatus::Suspended.code() }))
                .ip(ctx.client_ip),
        );

        tracing::info!(user_id = %user.id, actor_id = %ctx.actor_id, "User deactivated");

        Ok(())
    }
}

fn parse_filter<T>(
    code: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
    what: &str,
) -> AdminResult<Option<T>> {
    match code {
        None | Some("") => Ok(None),
        Some(code) => parse(code)
            .map(Some)
            .ok_or_else(|| AdminError::Validation(format!("Invalid {what} filter"))),
    }
}

fn snapshot(user: &User) -> serde_json::Value {
    json!({
        "first_name": user.first_name,
        "last_name": user.last_name,
        "phone": user.phone,
        "role": user.role.code(),
        "status": user.status.code(),
    })
}
