//! PostgreSQL Repository Implementation

use auth::models::KycLevel;
use chrono::{DateTime, Utc};
use kernel::id::{KycVerificationId, UserId};
use kernel::page::PageQuery;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::verification::KycVerification;
use crate::domain::repository::{
    DocumentRequest, KycStats, KycVerificationRepository, QueueEntry, UserSummary,
    VerificationDetail,
};
use crate::domain::value_object::verification_status::VerificationStatus;
use crate::error::{KycError, KycResult};

const KYC_COLUMNS: &str = "id, user_id, level, status, verification_data, \
     rejection_reason, verified_by, verified_at, created_at, updated_at";

/// PostgreSQL-backed verification repository
#[derive(Clone)]
pub struct PgKycRepository {
    pool: PgPool,
}

impl PgKycRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl KycVerificationRepository for PgKycRepository {
    async fn find_by_id(&self, id: &KycVerificationId) -> KycResult<Option<KycVerification>> {
        let row = sqlx::query_as::<_, KycVerificationRow>(&format!(
            "SELECT {KYC_COLUMNS} FROM kyc_verifications WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_verification()).transpose()
    }

    async fn approve_if_reviewable(
        &self,
        id: &KycVerificationId,
        verifier: &UserId,
    ) -> KycResult<Option<KycVerification>> {
        let row = sqlx::query_as::<_, KycVerificationRow>(&format!(
            r#"
            UPDATE kyc_verifications SET
                status = 'approved',
                verified_by = $2,
                verified_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status IN ('pending', 'under_review')
            RETURNING {KYC_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(verifier.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_verification()).transpose()
    }

    async fn reject_if_reviewable(
        &self,
        id: &KycVerificationId,
        verifier: &UserId,
        reason: &str,
    ) -> KycResult<Option<KycVerification>> {
        let row = sqlx::query_as::<_, KycVerificationRow>(&format!(
            r#"
            UPDATE kyc_verifications SET
                status = 'rejected',
                rejection_reason = $3,
                verified_by = $2,
                verified_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status IN ('pending', 'under_review')
            RETURNING {KYC_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(verifier.as_uuid())
        .bind(reason)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_verification()).transpose()
    }

    async fn reopen_for_docs(
        &self,
        id: &KycVerificationId,
        request: &DocumentRequest,
    ) -> KycResult<Option<KycVerification>> {
        let request_json = serde_json::to_value(request)
            .map_err(|e| KycError::Internal(format!("document request serialization: {e}")))?;

        // The request is merged under its own key so submitted documents
        // are never clobbered. No status guard: reopening terminal
        // records is intentional.
        let row = sqlx::query_as::<_, KycVerificationRow>(&format!(
            r#"
            UPDATE kyc_verifications SET
                status = 'under_review',
                verification_data =
                    COALESCE(verification_data, '{{}}'::jsonb)
                    || jsonb_build_object('document_request', $2::jsonb),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {KYC_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(request_json)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_verification()).transpose()
    }

    async fn queue(
        &self,
        status: VerificationStatus,
        page: &PageQuery,
    ) -> KycResult<(Vec<QueueEntry>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM kyc_verifications WHERE status = $1")
                .bind(status.code())
                .fetch_one(&self.pool)
                .await?;

        let (_, limit) = page.normalize();
        let rows = sqlx::query_as::<_, QueueRow>(
            r#"
            SELECT
                v.id, v.user_id, v.level, v.status, v.verification_data,
                v.rejection_reason, v.verified_by, v.verified_at,
                v.created_at, v.updated_at,
                u.email AS submitter_email,
                u.first_name AS submitter_first_name,
                u.last_name AS submitter_last_name
            FROM kyc_verifications v
            JOIN users u ON u.id = v.user_id
            WHERE v.status = $1
            ORDER BY v.created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status.code())
        .bind(limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .map(|r| r.into_entry())
            .collect::<KycResult<Vec<_>>>()?;

        Ok((entries, total))
    }

    async fn find_detail(
        &self,
        id: &KycVerificationId,
    ) -> KycResult<Option<VerificationDetail>> {
        let row = sqlx::query_as::<_, DetailRow>(
            r#"
            SELECT
                v.id, v.user_id, v.level, v.status, v.verification_data,
                v.rejection_reason, v.verified_by, v.verified_at,
                v.created_at, v.updated_at,
                s.email AS submitter_email,
                s.first_name AS submitter_first_name,
                s.last_name AS submitter_last_name,
                r.email AS verifier_email,
                r.first_name AS verifier_first_name,
                r.last_name AS verifier_last_name
            FROM kyc_verifications v
            JOIN users s ON s.id = v.user_id
            LEFT JOIN users r ON r.id = v.verified_by
            WHERE v.id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_detail()).transpose()
    }

    async fn history_for_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> KycResult<Vec<KycVerification>> {
        let rows = sqlx::query_as::<_, KycVerificationRow>(&format!(
            "SELECT {KYC_COLUMNS} FROM kyc_verifications \
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(user_id.as_uuid())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_verification()).collect()
    }

    async fn stats(&self) -> KycResult<KycStats> {
        let counts: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM kyc_verifications GROUP BY status")
                .fetch_all(&self.pool)
                .await?;

        let today_submissions: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM kyc_verifications WHERE created_at >= date_trunc('day', NOW())",
        )
        .fetch_one(&self.pool)
        .await?;

        let today_approvals: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM kyc_verifications \
             WHERE status = 'approved' AND verified_at >= date_trunc('day', NOW())",
        )
        .fetch_one(&self.pool)
        .await?;

        let avg_processing_hours: Option<f64> = sqlx::query_scalar(
            "SELECT AVG(EXTRACT(EPOCH FROM (verified_at - created_at)) / 3600.0)::float8 \
             FROM kyc_verifications WHERE verified_at IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await?;

        let mut stats = KycStats {
            today_submissions,
            today_approvals,
            avg_processing_hours,
            ..KycStats::default()
        };
        for (status, count) in counts {
            match VerificationStatus::from_code(&status) {
                Some(VerificationStatus::Pending) => stats.pending = count,
                Some(VerificationStatus::UnderReview) => stats.under_review = count,
                Some(VerificationStatus::Approved) => stats.approved = count,
                Some(VerificationStatus::Rejected) => stats.rejected = count,
                None => {
                    tracing::warn!(status, "Unknown verification status in stats");
                }
            }
        }

        Ok(stats)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct KycVerificationRow {
    id: Uuid,
    user_id: Uuid,
    level: i32,
    status: String,
    verification_data: Option<serde_json::Value>,
    rejection_reason: Option<String>,
    verified_by: Option<Uuid>,
    verified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl KycVerificationRow {
    fn into_verification(self) -> KycResult<KycVerification> {
        let status = VerificationStatus::from_code(&self.status).ok_or_else(|| {
            KycError::Internal(format!("unknown verification status: {}", self.status))
        })?;
        let level = KycLevel::new(self.level)
            .ok_or_else(|| KycError::Internal(format!("level out of range: {}", self.level)))?;

        Ok(KycVerification {
            id: KycVerificationId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            level,
            status,
            verification_data: self.verification_data,
            rejection_reason: self.rejection_reason,
            verified_by: self.verified_by.map(UserId::from_uuid),
            verified_at: self.verified_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct QueueRow {
    #[sqlx(flatten)]
    verification: KycVerificationRow,
    submitter_email: String,
    submitter_first_name: String,
    submitter_last_name: String,
}

impl QueueRow {
    fn into_entry(self) -> KycResult<QueueEntry> {
        let submitter = UserSummary {
            id: UserId::from_uuid(self.verification.user_id),
            email: self.submitter_email,
            first_name: self.submitter_first_name,
            last_name: self.submitter_last_name,
        };
        Ok(QueueEntry {
            verification: self.verification.into_verification()?,
            submitter,
        })
    }
}

#[derive(sqlx::FromRow)]
struct DetailRow {
    #[sqlx(flatten)]
    verification: KycVerificationRow,
    submitter_email: String,
    submitter_first_name: String,
    submitter_last_name: String,
    verifier_email: Option<String>,
    verifier_first_name: Option<String>,
    verifier_last_name: Option<String>,
}

impl DetailRow {
    fn into_detail(self) -> KycResult<VerificationDetail> {
        let submitter = UserSummary {
            id: UserId::from_uuid(self.verification.user_id),
            email: self.submitter_email,
            first_name: self.submitter_first_name,
            last_name: self.submitter_last_name,
        };
        let verifier = match (
            self.verification.verified_by,
            self.verifier_email,
            self.verifier_first_name,
            self.verifier_last_name,
        ) {
            (Some(id), Some(email), Some(first_name), Some(last_name)) => Some(UserSummary {
                id: UserId::from_uuid(id),
                email,
                first_name,
                last_name,
            }),
            _ => None,
        };
        Ok(VerificationDetail {
            verification: self.verification.into_verification()?,
            submitter,
            verifier,
        })
    }
}
