//! Best-Effort Audit & Notification Side Channel
//!
//! Audit entries and notifications describe an action that already
//! happened; they must never fail or delay it. Writes are spawned onto
//! the runtime and failures are logged at warn level. Callers never
//! observe the result.

use std::sync::Arc;

use crate::domain::entity::audit_log::AuditLog;
use crate::domain::entity::notification::Notification;
use crate::domain::repository::{AuditLogRepository, NotificationRepository};

/// Fire-and-forget audit trail writer.
pub struct AuditTrail<A> {
    repo: Arc<A>,
}

impl<A> Clone for AuditTrail<A> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<A> AuditTrail<A>
where
    A: AuditLogRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<A>) -> Self {
        Self { repo }
    }

    /// Record an entry without blocking the caller.
    pub fn record(&self, entry: AuditLog) {
        let repo = Arc::clone(&self.repo);
        tokio::spawn(async move {
            if let Err(e) = repo.append(&entry).await {
                tracing::warn!(
                    action = %entry.action,
                    entity_type = %entry.entity_type,
                    error = %e,
                    "Failed to write audit log entry"
                );
            }
        });
    }
}

/// Fire-and-forget notification dispatcher.
pub struct Notifier<N> {
    repo: Arc<N>,
}

impl<N> Clone for Notifier<N> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<N> Notifier<N>
where
    N: NotificationRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<N>) -> Self {
        Self { repo }
    }

    /// Deliver a notification without blocking the caller.
    pub fn notify(&self, notification: Notification) {
        let repo = Arc::clone(&self.repo);
        tokio::spawn(async move {
            if let Err(e) = repo.push(&notification).await {
                tracing::warn!(
                    user_id = %notification.user_id,
                    kind = %notification.kind,
                    error = %e,
                    "Failed to deliver notification"
                );
            }
        });
    }
}
