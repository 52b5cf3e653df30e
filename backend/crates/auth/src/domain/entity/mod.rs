//! Domain Entities

pub mod audit_log;
pub mod notification;
pub mod user;

pub use audit_log::AuditLog;
pub use notification::Notification;
pub use user::User;
