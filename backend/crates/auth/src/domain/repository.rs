//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! The KYC and admin crates drive user-account mutations through these same
//! traits, so user-state invariants live in one place.

use kernel::id::UserId;
use kernel::page::PageQuery;

use crate::domain::entity::audit_log::AuditLog;
use crate::domain::entity::notification::Notification;
use crate::domain::entity::user::User;
use crate::domain::value_object::email::Email;
use crate::domain::value_object::kyc::KycLevel;
use crate::domain::value_object::user_role::UserRole;
use crate::domain::value_object::user_status::UserStatus;
use crate::error::AuthResult;

/// Filters for the admin user listing.
#[derive(Debug, Clone, Default)]
pub struct UserListFilter {
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    /// Case-insensitive substring match on email, first or last name.
    pub search: Option<String>,
}

/// Filters for the admin audit log listing.
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub actor_id: Option<UserId>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
}

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email (emails are stored lowercased)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &Email) -> AuthResult<bool>;

    /// Update mutable profile fields (name, phone, role, status)
    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Replace the password hash
    async fn update_password(&self, user_id: &UserId, password_hash: &str) -> AuthResult<()>;

    /// Stamp last_login_at
    async fn record_login(&self, user_id: &UserId) -> AuthResult<()>;

    /// Set account status
    async fn set_status(&self, user_id: &UserId, status: UserStatus) -> AuthResult<()>;

    /// Cascade an approved verification onto the account: status becomes
    /// verified and the level only ever rises.
    async fn apply_kyc_approval(&self, user_id: &UserId, level: KycLevel) -> AuthResult<()>;

    /// Cascade a rejected verification; the level is untouched.
    async fn mark_kyc_rejected(&self, user_id: &UserId) -> AuthResult<()>;

    /// Filtered listing, newest first, with the total matching count.
    async fn list(
        &self,
        filter: &UserListFilter,
        page: &PageQuery,
    ) -> AuthResult<(Vec<User>, i64)>;
}

/// Audit log repository trait
#[trait_variant::make(AuditLogRepository: Send)]
pub trait LocalAuditLogRepository {
    /// Append an entry
    async fn append(&self, entry: &AuditLog) -> AuthResult<()>;

    /// Filtered listing, newest first, with the total matching count.
    async fn list(
        &self,
        filter: &AuditLogFilter,
        page: &PageQuery,
    ) -> AuthResult<(Vec<AuditLog>, i64)>;
}

/// Notification repository trait
#[trait_variant::make(NotificationRepository: Send)]
pub trait LocalNotificationRepository {
    /// Store a notification for a user
    async fn push(&self, notification: &Notification) -> AuthResult<()>;
}
