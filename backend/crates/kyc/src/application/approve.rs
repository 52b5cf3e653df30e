//! Approve Verification Use Case
//!
//! Approval is a conditional update: it only fires while the record is
//! still reviewable, then cascades onto the user account. The account
//! level is raised to the submitted level, never lowered.

use std::sync::Arc;

use auth::application::audit::{AuditTrail, Notifier};
use auth::domain::entity::audit_log::AuditLog;
use auth::domain::entity::notification::Notification;
use auth::domain::repository::{AuditLogRepository, NotificationRepository, UserRepository};
use kernel::id::{KycVerificationId, UserId};
use serde_json::json;

use crate::domain::entity::verification::KycVerification;
use crate::domain::repository::KycVerificationRepository;
use crate::error::{KycError, KycResult};

/// Who is reviewing, and from where.
#[derive(Debug, Clone)]
pub struct ReviewContext {
    pub actor_id: UserId,
    pub client_ip: Option<String>,
}

/// Approve verification use case
pub struct ApproveVerificationUseCase<K, R>
where
    K: KycVerificationRepository,
    R: UserRepository + AuditLogRepository + NotificationRepository + Send + Sync + 'static,
{
    kyc_repo: Arc<K>,
    users: Arc<R>,
    audit: AuditTrail<R>,
    notifier: Notifier<R>,
}

impl<K, R> ApproveVerificationUseCase<K, R>
where
    K: KycVerificationRepository,
    R: UserRepository + AuditLogRepository + NotificationRepository + Send + Sync + 'static,
{
    pub fn new(
        kyc_repo: Arc<K>,
        users: Arc<R>,
        audit: AuditTrail<R>,
        notifier: Notifier<R>,
    ) -> Self {
        Self {
            kyc_repo,
            users,
            audit,
            notifier,
        }
    }

    pub async fn execute(
        &self,
        id: &KycVerificationId,
        ctx: ReviewContext,
    ) -> KycResult<KycVerification> {
        let existing = self
            .kyc_repo
            .find_by_id(id)
            .await?
            .ok_or(KycError::VerificationNotFound)?;

        // Conditional update; a racing decision loses here instead of
        // double-processing.
        let updated = self
            .kyc_repo
            .approve_if_reviewable(id, &ctx.actor_id)
            .await?
            .ok_or(KycError::AlreadyProcessed)?;

        self.users
            .apply_kyc_approval(&updated.user_id, updated.level)
            .await?;

        self.audit.record(
            AuditLog::new("kyc_approve", "kyc_verification")
                .actor(ctx.actor_id)
                .entity(id.into_uuid())
                .old_values(json!({ "status": existing.status.code() }))
                .new_values(json!({
                    "status": updated.status.code(),
                    "level": updated.level.value(),
                }))
                .ip(ctx.client_ip),
        );
        self.notifier.notify(
            Notification::new(
                updated.user_id,
                "kyc_approved",
                "KYC Verification Approved",
                format!(
                    "Your level {} KYC verification has been approved.",
                    updated.level
                ),
            )
            .with_data(json!({ "verification_id": id.into_uuid() })),
        );

        tracing::info!(
            verification_id = %id,
            user_id = %updated.user_id,
            level = updated.level.value(),
            "KYC verification approved"
        );

        Ok(updated)
    }
}
