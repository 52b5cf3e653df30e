//! Request Documents Use Case
//!
//! A reviewer asks the submitter for more material. Unlike approve and
//! reject this deliberately works from any state, including terminal
//! ones: reopening a decided record is the appeal path, and it moves
//! the record back to under_review.

use std::sync::Arc;

use auth::application::audit::{AuditTrail, Notifier};
use auth::domain::entity::audit_log::AuditLog;
use auth::domain::entity::notification::Notification;
use auth::domain::repository::{AuditLogRepository, NotificationRepository};
use chrono::Utc;
use kernel::id::KycVerificationId;
use serde_json::json;

use crate::application::approve::ReviewContext;
use crate::domain::entity::verification::KycVerification;
use crate::domain::repository::{DocumentRequest, KycVerificationRepository};
use crate::error::{KycError, KycResult};

/// Request documents input
pub struct RequestDocumentsInput {
    pub message: String,
    pub required_documents: Vec<String>,
}

/// Request documents use case
pub struct RequestDocumentsUseCase<K, R>
where
    K: KycVerificationRepository,
    R: AuditLogRepository + NotificationRepository + Send + Sync + 'static,
{
    kyc_repo: Arc<K>,
    audit: AuditTrail<R>,
    notifier: Notifier<R>,
}

impl<K, R> RequestDocumentsUseCase<K, R>
where
    K: KycVerificationRepository,
    R: AuditLogRepository + NotificationRepository + Send + Sync + 'static,
{
    pub fn new(kyc_repo: Arc<K>, audit: AuditTrail<R>, notifier: Notifier<R>) -> Self {
        Self {
            kyc_repo,
            audit,
            notifier,
        }
    }

    pub async fn execute(
        &self,
        id: &KycVerificationId,
        input: RequestDocumentsInput,
        ctx: ReviewContext,
    ) -> KycResult<KycVerification> {
        let message = input.message.trim();
        if message.is_empty() {
            return Err(KycError::MissingMessage);
        }

        let request = DocumentRequest {
            message: message.to_string(),
            required_documents: input.required_documents,
            requested_by: ctx.actor_id,
            requested_at: Utc::now(),
        };

        let updated = self
            .kyc_repo
            .reopen_for_docs(id, &request)
            .await?
            .ok_or(KycError::VerificationNotFound)?;

        self.audit.record(
            AuditLog::new("kyc_request_documents", "kyc_verification")
                .actor(ctx.actor_id)
                .entity(id.into_uuid())
                .new_values(json!({
                    "status": updated.status.code(),
                    "message": request.message.clone(),
                    "required_documents": request.required_documents.clone(),
                }))
                .ip(ctx.client_ip),
        );
        self.notifier.notify(
            Notification::new(
                updated.user_id,
                "kyc_documents_requested",
                "Additional Documents Required",
                request.message.clone(),
            )
            .with_data(json!({
                "verification_id": id.into_uuid(),
                "required_documents": request.required_documents,
            })),
        );

        tracing::info!(
            verification_id = %id,
            user_id = %updated.user_id,
            "Documents requested for KYC verification"
        );

        Ok(updated)
    }
}
