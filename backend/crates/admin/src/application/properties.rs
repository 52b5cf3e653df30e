//! Property Moderation Use Cases
//!
//! Sellers submit listings elsewhere; admins review the pending queue
//! and either activate or reject. The decision is a conditional update
//! from pending, so a listing is decided at most once.

use std::sync::Arc;

use auth::application::audit::{AuditTrail, Notifier};
use auth::domain::entity::audit_log::AuditLog;
use auth::domain::entity::notification::Notification;
use auth::domain::repository::{AuditLogRepository, NotificationRepository};
use kernel::id::PropertyId;
use kernel::page::{PageMeta, PageQuery};
use serde_json::json;

use crate::application::users::AdminContext;
use crate::domain::entity::property::Property;
use crate::domain::repository::{PendingProperty, PropertyRepository};
use crate::domain::value_object::property_status::PropertyStatus;
use crate::error::{AdminError, AdminResult};

/// Property moderation use case
pub struct PropertyModeration<P, R>
where
    P: PropertyRepository,
    R: AuditLogRepository + NotificationRepository + Send + Sync + 'static,
{
    properties: Arc<P>,
    audit: AuditTrail<R>,
    notifier: Notifier<R>,
}

impl<P, R> PropertyModeration<P, R>
where
    P: PropertyRepository,
    R: AuditLogRepository + NotificationRepository + Send + Sync + 'static,
{
    pub fn new(properties: Arc<P>, audit: AuditTrail<R>, notifier: Notifier<R>) -> Self {
        Self {
            properties,
            audit,
            notifier,
        }
    }

    /// Pending listings, oldest first.
    pub async fn pending(
        &self,
        page: &PageQuery,
    ) -> AdminResult<(Vec<PendingProperty>, PageMeta)> {
        let (properties, total) = self.properties.list_pending(page).await?;
        Ok((properties, PageMeta::new(page, total)))
    }

    /// Decide a pending listing: activate it or reject it.
    pub async fn decide(
        &self,
        id: &PropertyId,
        status: &str,
        reason: Option<String>,
        ctx: AdminContext,
    ) -> AdminResult<Property> {
        let decision = PropertyStatus::from_code(status)
            .filter(PropertyStatus::is_decision)
            .ok_or(AdminError::InvalidPropertyStatus)?;

        let existing = self
            .properties
            .find_property(id)
            .await?
            .ok_or(AdminError::PropertyNotFound)?;

        let reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());

        // Conditional update; a racing decision loses here instead of
        // flipping an already-decided listing.
        let updated = match decision {
            PropertyStatus::Active => {
                self.properties
                    .activate_if_pending(id, &ctx.actor_id)
                    .await?
            }
            PropertyStatus::Rejected => {
                self.properties
                    .reject_if_pending(id, &ctx.actor_id, reason.as_deref())
                    .await?
            }
            PropertyStatus::Pending => unreachable!("filtered above"),
        }
        .ok_or(AdminError::PropertyAlreadyDecided)?;

        self.audit.record(
            AuditLog::new("property_status_update", "property")
                .actor(ctx.actor_id)
                .entity(id.into_uuid())
                .old_values(json!({ "status": existing.status.code() }))
                .new_values(json!({
                    "status": updated.status.code(),
                    "rejection_reason": updated.rejection_reason,
                }))
                .ip(ctx.client_ip),
        );

        let (kind, title, message) = match decision {
            PropertyStatus::Active => (
                "property_approved",
                "Property Approved",
                format!("Your property \"{}\" is now live.", updated.title),
            ),
            _ => (
                "property_rejected",
                "Property Rejected",
                match &updated.rejection_reason {
                    Some(reason) => {
                        format!("Your property \"{}\" was rejected: {reason}", updated.title)
                    }
                    None => format!("Your property \"{}\" was rejected.", updated.title),
                },
            ),
        };
        self.notifier.notify(
            Notification::new(updated.seller_id, kind, title, message)
                .with_data(json!({ "property_id": id.into_uuid() })),
        );

        tracing::info!(
            property_id = %id,
            status = %updated.status,
            actor_id = %ctx.actor_id,
            "Property moderated"
        );

        Ok(updated)
    }
}
