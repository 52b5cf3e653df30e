//! Property Entity
//!
//! Listings are created by sellers outside this service; this crate
//! covers the moderation side: the pending queue and the
//! activate/reject decision.

use chrono::{DateTime, Utc};
use kernel::id::{PropertyId, UserId};
use rust_decimal::Decimal;

use crate::domain::value_object::property_status::PropertyStatus;

#[derive(Debug, Clone)]
pub struct Property {
    pub id: PropertyId,
    pub seller_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub city: String,
    pub total_value: Decimal,
    pub funding_target: Decimal,
    pub min_investment: Decimal,
    pub max_investment: Decimal,
    pub raised_amount: Decimal,
    pub status: PropertyStatus,
    pub rejection_reason: Option<String>,
    pub approved_by: Option<UserId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn is_pending(&self) -> bool {
        self.status == PropertyStatus::Pending
    }
}
