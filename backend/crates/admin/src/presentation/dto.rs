//! Data Transfer Objects

use auth::domain::entity::audit_log::AuditLog;
use auth::models::UserResponse;
use chrono::{DateTime, Utc};
use kernel::page::{PageMeta, PageQuery};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::property::Property;
use crate::domain::repository::{
    DashboardStats, PendingProperty, SellerSummary, TransactionEntry,
};

// ============================================================================
// Requests
// ============================================================================

// Page params are inlined rather than flattened: serde's flatten
// buffers values as strings, which breaks integer query parsing.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl UsersQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PropertyStatusRequest {
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl TransactionsQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuditLogsQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub entity_type: Option<String>,
}

impl AuditLogsQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserResponse>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    pub user: UserResponse,
}

/// Returned once at staff creation; the plaintext temporary password is
/// never available again.
#[derive(Debug, Serialize)]
pub struct StaffCreatedResponse {
    pub message: String,
    pub user: UserResponse,
    pub temporary_password: String,
    pub note: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyResponse {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub city: String,
    pub total_value: Decimal,
    pub funding_target: Decimal,
    pub min_investment: Decimal,
    pub max_investment: Decimal,
    pub raised_amount: Decimal,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Property> for PropertyResponse {
    fn from(p: &Property) -> Self {
        Self {
            id: p.id.into_uuid(),
            seller_id: p.seller_id.into_uuid(),
            title: p.title.clone(),
            description: p.description.clone(),
            city: p.city.clone(),
            total_value: p.total_value,
            funding_target: p.funding_target,
            min_investment: p.min_investment,
            max_investment: p.max_investment,
            raised_amount: p.raised_amount,
            status: p.status.code().to_string(),
            rejection_reason: p.rejection_reason.clone(),
            approved_by: p.approved_by.map(|id| id.into_uuid()),
            approved_at: p.approved_at,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SellerResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

impl From<&SellerSummary> for SellerResponse {
    fn from(s: &SellerSummary) -> Self {
        Self {
            id: s.id.into_uuid(),
            email: s.email.clone(),
            first_name: s.first_name.clone(),
            last_name: s.last_name.clone(),
            phone: s.phone.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PendingPropertyResponse {
    #[serde(flatten)]
    pub property: PropertyResponse,
    pub seller: SellerResponse,
}

impl From<&PendingProperty> for PendingPropertyResponse {
    fn from(entry: &PendingProperty) -> Self {
        Self {
            property: PropertyResponse::from(&entry.property),
            seller: SellerResponse::from(&entry.seller),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PendingPropertiesResponse {
    pub properties: Vec<PendingPropertyResponse>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct PropertyDecisionResponse {
    pub message: String,
    pub property: PropertyResponse,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub status: String,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub user_email: String,
    pub user_first_name: String,
    pub user_last_name: String,
}

impl From<&TransactionEntry> for TransactionResponse {
    fn from(entry: &TransactionEntry) -> Self {
        Self {
            id: entry.transaction.id.into_uuid(),
            user_id: entry.transaction.user_id.into_uuid(),
            kind: entry.transaction.kind.clone(),
            status: entry.transaction.status.clone(),
            amount: entry.transaction.amount,
            created_at: entry.transaction.created_at,
            user_email: entry.user_email.clone(),
            user_first_name: entry.user_first_name.clone(),
            user_last_name: entry.user_last_name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionResponse>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct DashboardUsersSection {
    pub total: i64,
    pub investors: i64,
    pub sellers: i64,
    pub staff: i64,
    pub new_7d: i64,
    pub pending_kyc: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardPropertiesSection {
    pub total: i64,
    pub active: i64,
    pub pending: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardFinancialsSection {
    pub total_invested: Decimal,
    pub invested_7d: Decimal,
    pub completed_volume: Decimal,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub users: DashboardUsersSection,
    pub properties: DashboardPropertiesSection,
    pub financials: DashboardFinancialsSection,
    pub generated_at: DateTime<Utc>,
}

impl From<&DashboardStats> for DashboardResponse {
    fn from(s: &DashboardStats) -> Self {
        Self {
            users: DashboardUsersSection {
                total: s.total_users,
                investors: s.total_investors,
                sellers: s.total_sellers,
                staff: s.total_staff,
                new_7d: s.new_users_7d,
                pending_kyc: s.pending_kyc_users,
            },
            properties: DashboardPropertiesSection {
                total: s.total_properties,
                active: s.active_properties,
                pending: s.pending_properties,
            },
            financials: DashboardFinancialsSection {
                total_invested: s.total_invested,
                invested_7d: s.invested_7d,
                completed_volume: s.completed_volume,
            },
            generated_at: s.generated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuditLogResponse {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&AuditLog> for AuditLogResponse {
    fn from(entry: &AuditLog) -> Self {
        Self {
            id: entry.id.into_uuid(),
            actor_id: entry.actor_id.map(|id| id.into_uuid()),
            action: entry.action.clone(),
            entity_type: entry.entity_type.clone(),
            entity_id: entry.entity_id,
            old_values: entry.old_values.clone(),
            new_values: entry.new_values.clone(),
            ip_address: entry.ip_address.clone(),
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuditLogsResponse {
    pub logs: Vec<AuditLogResponse>,
    pub pagination: PageMeta,
}
