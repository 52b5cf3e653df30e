//! Reject Verification Use Case

use std::sync::Arc;

use auth::application::audit::{AuditTrail, Notifier};
use auth::domain::entity::audit_log::AuditLog;
use auth::domain::entity::notification::Notification;
use auth::domain::repository::{AuditLogRepository, NotificationRepository, UserRepository};
use kernel::id::KycVerificationId;
use serde_json::json;

use crate::application::approve::ReviewContext;
use crate::domain::entity::verification::KycVerification;
use crate::domain::repository::KycVerificationRepository;
use crate::error::{KycError, KycResult};

/// Reject verification use case
pub struct RejectVerificationUseCase<K, R>
where
    K: KycVerificationRepository,
    R: UserRepository + AuditLogRepository + NotificationRepository + Send + Sync + 'static,
{
    kyc_repo: Arc<K>,
    users: Arc<R>,
    audit: AuditTrail<R>,
    notifier: Notifier<R>,
}

impl<K, R> RejectVerificationUseCase<K, R>
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
        reason: &str,
        ctx: ReviewContext,
    ) -> KycResult<KycVerification> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(KycError::MissingReason);
        }

        let existing = self
            .kyc_repo
            .find_by_id(id)
            .await?
            .ok_or(KycError::VerificationNotFound)?;

        let updated = self
            .kyc_repo
            .reject_if_reviewable(id, &ctx.actor_id, reason)
            .await?
            .ok_or(KycError::AlreadyProcessed)?;

        // The account status flips to rejected; the verified level a user
        // already holds is left untouched.
        self.users.mark_kyc_rejected(&updated.user_id).await?;

        self.audit.record(
            AuditLog::new("kyc_reject", "kyc_verification")
                .actor(ctx.actor_id)
                .entity(id.into_uuid())
                .old_values(json!({ "status": existing.status.code() }))
                .new_values(json!({
                    "status": updated.status.code(),
                    "rejection_reason": reason,
                }))
                .ip(ctx.client_ip),
        );
        self.notifier.notify(
            Notification::new(
                updated.user_id,
                "kyc_rejected",
                "KYC Verification Rejected",
                format!("Your KYC verification was rejected: {reason}"),
            )
            .with_data(json!({
                "verification_id": id.into_uuid(),
                "rejection_reason": reason,
            })),
        );

        tracing::info!(
            verification_id = %id,
            user_id = %updated.user_id,
            "KYC verification rejected"
        );

        Ok(updated)
    }
}
