//! Read-Only KYC Queries
//!
//! Queue, detail, and statistics views for the review dashboard.

use std::sync::Arc;

use kernel::id::KycVerificationId;
use kernel::page::{PageMeta, PageQuery};

use crate::domain::entity::verification::KycVerification;
use crate::domain::repository::{
    KycStats, KycVerificationRepository, QueueEntry, VerificationDetail,
};
use crate::domain::value_object::verification_status::VerificationStatus;
use crate::error::{KycError, KycResult};

/// How many past verifications the detail view carries.
const HISTORY_LIMIT: i64 = 5;

/// KYC query use case
pub struct KycQueries<K>
where
    K: KycVerificationRepository,
{
    kyc_repo: Arc<K>,
}

impl<K> KycQueries<K>
where
    K: KycVerificationRepository,
{
    pub fn new(kyc_repo: Arc<K>) -> Self {
        Self { kyc_repo }
    }

    /// Review queue, oldest submissions first. Defaults to the pending
    /// backlog.
    pub async fn queue(
        &self,
        status: Option<&str>,
        page: &PageQuery,
    ) -> KycResult<(Vec<QueueEntry>, PageMeta)> {
        let status = match status {
            None | Some("") => VerificationStatus::Pending,
            Some(code) => {
                VerificationStatus::from_code(code).ok_or(KycError::InvalidStatusFilter)?
            }
        };

        let (entries, total) = self.kyc_repo.queue(status, page).await?;
        Ok((entries, PageMeta::new(page, total)))
    }

    /// Detail view plus the submitter's recent verification history
    /// (excluding the record being viewed).
    pub async fn detail(
        &self,
        id: &KycVerificationId,
    ) -> KycResult<(VerificationDetail, Vec<KycVerification>)> {
        let detail = self
            .kyc_repo
            .find_detail(id)
            .await?
            .ok_or(KycError::VerificationNotFound)?;

        let history = self
            .kyc_repo
            .history_for_user(&detail.verification.user_id, HISTORY_LIMIT + 1)
            .await?
            .into_iter()
            .filter(|v| v.id != *id)
            .take(HISTORY_LIMIT as usize)
            .collect();

        Ok((detail, history))
    }

    pub async fn stats(&self) -> KycResult<KycStats> {
        self.kyc_repo.stats().await
    }
}
