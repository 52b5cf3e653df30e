//! KYC Verification Entity
//!
//! One submitted verification at a requested level. Submission itself
//! happens outside this service; this crate only reviews records.

use auth::models::KycLevel;
use chrono::{DateTime, Utc};
use kernel::id::{KycVerificationId, UserId};

use crate::domain::value_object::verification_status::VerificationStatus;

#[derive(Debug, Clone)]
pub struct KycVerification {
    pub id: KycVerificationId,
    pub user_id: UserId,
    /// The level this submission asks to be verified at.
    pub level: KycLevel,
    pub status: VerificationStatus,
    /// Submitted documents plus any reviewer document requests.
    pub verification_data: Option<serde_json::Value>,
    pub rejection_reason: Option<String>,
    pub verified_by: Option<UserId>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl KycVerification {
    pub fn is_reviewable(&self) -> bool {
        self.status.is_reviewable()
    }
}
