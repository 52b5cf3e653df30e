//! Repository Traits
//!
//! Interfaces for verification persistence. Approve/reject are
//! conditional updates that only fire on reviewable records, so two
//! concurrent reviewers cannot both process the same submission.

use chrono::{DateTime, Utc};
use kernel::id::{KycVerificationId, UserId};
use kernel::page::PageQuery;

use crate::domain::entity::verification::KycVerification;
use crate::domain::value_object::verification_status::VerificationStatus;
use crate::error::KycResult;

/// Joined submitter/verifier identity for queue and detail views.
#[derive(Debug, Clone)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// One queue row: the verification plus who submitted it.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub verification: KycVerification,
    pub submitter: UserSummary,
}

/// Full detail view of one verification.
#[derive(Debug, Clone)]
pub struct VerificationDetail {
    pub verification: KycVerification,
    pub submitter: UserSummary,
    pub verifier: Option<UserSummary>,
}

/// Aggregate review statistics.
#[derive(Debug, Clone, Default)]
pub struct KycStats {
    pub pending: i64,
    pub under_review: i64,
    pub approved: i64,
    pub rejected: i64,
    /// Submissions created today (calendar day, server time).
    pub today_submissions: i64,
    /// Approvals decided today.
    pub today_approvals: i64,
    /// Mean hours from submission to decision, over decided records.
    pub avg_processing_hours: Option<f64>,
}

/// A reviewer's document request, merged into `verification_data`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DocumentRequest {
    pub message: String,
    pub required_documents: Vec<String>,
    pub requested_by: UserId,
    pub requested_at: DateTime<Utc>,
}

/// Verification repository trait
#[trait_variant::make(KycVerificationRepository: Send)]
pub trait LocalKycVerificationRepository {
    /// Find a verification by id
    async fn find_by_id(&self, id: &KycVerificationId) -> KycResult<Option<KycVerification>>;

    /// Approve, only if the record is still reviewable. Returns the
    /// updated record, or None when it was already terminal.
    async fn approve_if_reviewable(
        &self,
        id: &KycVerificationId,
        verifier: &UserId,
    ) -> KycResult<Option<KycVerification>>;

    /// Reject with a reason, only if the record is still reviewable.
    async fn reject_if_reviewable(
        &self,
        id: &KycVerificationId,
        verifier: &UserId,
        reason: &str,
    ) -> KycResult<Option<KycVerification>>;

    /// Merge a document request into `verification_data` and move the
    /// record to under_review, from any state. Returns None only when
    /// the record does not exist.
    async fn reopen_for_docs(
        &self,
        id: &KycVerificationId,
        request: &DocumentRequest,
    ) -> KycResult<Option<KycVerification>>;

    /// Queue of verifications in one status, oldest first, with
    /// submitter info and the total matching count.
    async fn queue(
        &self,
        status: VerificationStatus,
        page: &PageQuery,
    ) -> KycResult<(Vec<QueueEntry>, i64)>;

    /// Detail view with submitter and verifier identity.
    async fn find_detail(&self, id: &KycVerificationId)
    -> KycResult<Option<VerificationDetail>>;

    /// Most recent verifications of one user, newest first.
    async fn history_for_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> KycResult<Vec<KycVerification>>;

    /// Aggregate statistics over all verifications.
    async fn stats(&self) -> KycResult<KycStats>;
}
