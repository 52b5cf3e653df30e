//! Data Transfer Objects

use chrono::{DateTime, Utc};
use kernel::page::{PageMeta, PageQuery};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::verification::KycVerification;
use crate::domain::repository::{KycStats, QueueEntry, UserSummary, VerificationDetail};

// ============================================================================
// Requests
// ============================================================================

// Page params are inlined rather than flattened: serde's flatten
// buffers values as strings, which breaks integer query parsing.
#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl QueueQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

// Body fields are optional at the wire so a missing value reaches the
// use case's validation (400 with a message) instead of dying in the
// Json extractor as a 422.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RequestDocumentsRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub required_documents: Vec<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct VerificationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub level: i32,
    pub status: String,
    pub verification_data: Option<serde_json::Value>,
    pub rejection_reason: Option<String>,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&KycVerification> for VerificationResponse {
    fn from(v: &KycVerification) -> Self {
        Self {
            id: v.id.into_uuid(),
            user_id: v.user_id.into_uuid(),
            level: v.level.value(),
            status: v.status.code().to_string(),
            verification_data: v.verification_data.clone(),
            rejection_reason: v.rejection_reason.clone(),
            verified_by: v.verified_by.map(|id| id.into_uuid()),
            verified_at: v.verified_at,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummaryResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&UserSummary> for UserSummaryResponse {
    fn from(u: &UserSummary) -> Self {
        Self {
            id: u.id.into_uuid(),
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueueItemResponse {
    #[serde(flatten)]
    pub verification: VerificationResponse,
    pub user: UserSummaryResponse,
}

impl From<&QueueEntry> for QueueItemResponse {
    fn from(entry: &QueueEntry) -> Self {
        Self {
            verification: VerificationResponse::from(&entry.verification),
            user: UserSummaryResponse::from(&entry.submitter),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueueResponse {
    pub verifications: Vec<QueueItemResponse>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    #[serde(flatten)]
    pub verification: VerificationResponse,
    pub user: UserSummaryResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verifier: Option<UserSummaryResponse>,
    pub history: Vec<VerificationResponse>,
}

impl DetailResponse {
    pub fn new(detail: &VerificationDetail, history: &[KycVerification]) -> Self {
        Self {
            verification: VerificationResponse::from(&detail.verification),
            user: UserSummaryResponse::from(&detail.submitter),
            verifier: detail.verifier.as_ref().map(UserSummaryResponse::from),
            history: history.iter().map(VerificationResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub pending: i64,
    pub under_review: i64,
    pub approved: i64,
    pub rejected: i64,
    pub today_submissions: i64,
    pub today_approvals: i64,
    pub avg_processing_hours: Option<f64>,
}

impl From<&KycStats> for StatsResponse {
    fn from(s: &KycStats) -> Self {
        Self {
            pending: s.pending,
            under_review: s.under_review,
            approved: s.approved,
            rejected: s.rejected,
            today_submissions: s.today_submissions,
            today_approvals: s.today_approvals,
            avg_processing_hours: s.avg_processing_hours,
        }
    }
}

/// Approve/reject/request-docs response: message + updated record.
#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub message: String,
    pub verification: VerificationResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_queue_query_parsing() {
        let q: QueueQuery = serde_urlencoded::from_str("status=approved&page=2&limit=10").unwrap();
        assert_eq!(q.status.as_deref(), Some("approved"));
        assert_eq!(q.page_query().normalize(), (2, 10));

        let q: QueueQuery = serde_urlencoded::from_str("").unwrap();
        assert!(q.status.is_none());
        assert!(q.page.is_none());
    }

    // The admin frontend sends `rejection_reason`; a missing value must
    // still deserialize so the use case can answer with its 400.
    #[test]
    fn test_reject_request_wire_field() {
        let r: RejectRequest =
            serde_json::from_value(json!({ "rejection_reason": "Documents illegible" })).unwrap();
        assert_eq!(r.rejection_reason.as_deref(), Some("Documents illegible"));

        let r: RejectRequest = serde_json::from_value(json!({})).unwrap();
        assert!(r.rejection_reason.is_none());
    }

    #[test]
    fn test_request_documents_wire_defaults() {
        let r: RequestDocumentsRequest = serde_json::from_value(json!({
            "message": "Please upload a utility bill",
            "required_documents": ["utility_bill"],
        }))
        .unwrap();
        assert_eq!(r.message.as_deref(), Some("Please upload a utility bill"));
        assert_eq!(r.required_documents, ["utility_bill"]);

        let r: RequestDocumentsRequest = serde_json::from_value(json!({})).unwrap();
        assert!(r.message.is_none());
        assert!(r.required_documents.is_empty());
    }
}
