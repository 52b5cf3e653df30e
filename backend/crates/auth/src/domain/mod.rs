//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{audit_log::AuditLog, notification::Notification, user::User};
pub use repository::{AuditLogRepository, NotificationRepository, UserRepository};
