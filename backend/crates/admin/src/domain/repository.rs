//! Repository Traits
//!
//! Read/moderation interfaces for the admin surface. Property decisions
//! are conditional updates that only fire while the listing is pending,
//! so two concurrent admins cannot both decide the same one. User
//! mutations go through the auth crate's `UserRepository`.

use chrono::{DateTime, Utc};
use kernel::id::{PropertyId, UserId};
use kernel::page::PageQuery;
use rust_decimal::Decimal;

use crate::domain::entity::property::Property;
use crate::domain::entity::transaction::Transaction;
use crate::error::AdminResult;

/// Joined seller identity for the pending-property queue.
#[derive(Debug, Clone)]
pub struct SellerSummary {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// One pending listing plus who submitted it.
#[derive(Debug, Clone)]
pub struct PendingProperty {
    pub property: Property,
    pub seller: SellerSummary,
}

/// Filters for the transaction listing.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<String>,
    pub status: Option<String>,
}

/// One transaction row plus the user it belongs to.
#[derive(Debug, Clone)]
pub struct TransactionEntry {
    pub transaction: Transaction,
    pub user_email: String,
    pub user_first_name: String,
    pub user_last_name: String,
}

/// Aggregate platform statistics for the admin dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_investors: i64,
    pub total_sellers: i64,
    /// Staff plus operations managers.
    pub total_staff: i64,
    /// Users created in the trailing 7 days.
    pub new_users_7d: i64,
    /// Users whose account-level KYC standing is still pending.
    pub pending_kyc_users: i64,
    pub total_properties: i64,
    pub active_properties: i64,
    pub pending_properties: i64,
    /// Sum of all investment transactions.
    pub total_invested: Decimal,
    /// Investment volume in the trailing 7 days.
    pub invested_7d: Decimal,
    /// Sum of all completed transactions.
    pub completed_volume: Decimal,
    pub generated_at: DateTime<Utc>,
}

/// Property repository trait
#[trait_variant::make(PropertyRepository: Send)]
pub trait LocalPropertyRepository {
    /// Find a property by id
    async fn find_property(&self, id: &PropertyId) -> AdminResult<Option<Property>>;

    /// Pending listings with seller info, oldest first, with the total
    /// matching count.
    async fn list_pending(
        &self,
        page: &PageQuery,
    ) -> AdminResult<(Vec<PendingProperty>, i64)>;

    /// Activate, only while the listing is still pending. Returns the
    /// updated property, or None when it was already decided.
    async fn activate_if_pending(
        &self,
        id: &PropertyId,
        approver: &UserId,
    ) -> AdminResult<Option<Property>>;

    /// Reject with an optional reason, only while still pending.
    async fn reject_if_pending(
        &self,
        id: &PropertyId,
        approver: &UserId,
        reason: Option<&str>,
    ) -> AdminResult<Option<Property>>;
}

/// Transaction repository trait
#[trait_variant::make(TransactionRepository: Send)]
pub trait LocalTransactionRepository {
    /// Filtered listing with user info, newest first, with the total
    /// matching count.
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        page: &PageQuery,
    ) -> AdminResult<(Vec<TransactionEntry>, i64)>;
}

/// Dashboard repository trait
#[trait_variant::make(DashboardRepository: Send)]
pub trait LocalDashboardRepository {
    /// Aggregate statistics over users, properties, and transactions.
    async fn dashboard_stats(&self) -> AdminResult<DashboardStats>;
}
