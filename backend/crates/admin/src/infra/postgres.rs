//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{PropertyId, TransactionId, UserId};
use kernel::page::PageQuery;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::entity::property::Property;
use crate::domain::entity::transaction::Transaction;
use crate::domain::repository::{
    DashboardRepository, DashboardStats, PendingProperty, PropertyRepository, SellerSummary,
    TransactionEntry, TransactionFilter, TransactionRepository,
};
use crate::domain::value_object::property_status::PropertyStatus;
use crate::error::{AdminError, AdminResult};

const PROPERTY_COLUMNS: &str = "id, seller_id, title, description, city, total_value, \
     funding_target, min_investment, max_investment, raised_amount, status, \
     rejection_reason, approved_by, approved_at, created_at, updated_at";

/// PostgreSQL-backed admin repository
#[derive(Clone)]
pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PropertyRepository for PgAdminRepository {
    async fn find_property(&self, id: &PropertyId) -> AdminResult<Option<Property>> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_property()).transpose()
    }

    async fn list_pending(
        &self,
        page: &PageQuery,
    ) -> AdminResult<(Vec<PendingProperty>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM properties WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await?;

        let (_, limit) = page.normalize();
        let rows = sqlx::query_as::<_, PendingPropertyRow>(
            r#"
            SELECT
                p.id, p.seller_id, p.title, p.description, p.city, p.total_value,
                p.funding_target, p.min_investment, p.max_investment, p.raised_amount,
                p.status, p.rejection_reason, p.approved_by, p.approved_at,
                p.created_at, p.updated_at,
                u.email AS seller_email,
                u.first_name AS seller_first_name,
                u.last_name AS seller_last_name,
                u.phone AS seller_phone
            FROM properties p
            JOIN users u ON u.id = p.seller_id
            WHERE p.status = 'pending'
            ORDER BY p.created_at ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .map(|r| r.into_entry())
            .collect::<AdminResult<Vec<_>>>()?;

        Ok((entries, total))
    }

    async fn activate_if_pending(
        &self,
        id: &PropertyId,
        approver: &UserId,
    ) -> AdminResult<Option<Property>> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            r#"
            UPDATE properties SET
                status = 'active',
                approved_by = $2,
                approved_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {PROPERTY_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(approver.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_property()).transpose()
    }

    async fn reject_if_pending(
        &self,
        id: &PropertyId,
        approver: &UserId,
        reason: Option<&str>,
    ) -> AdminResult<Option<Property>> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            r#"
            UPDATE properties SET
                status = 'rejected',
                rejection_reason = $3,
                approved_by = $2,
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {PROPERTY_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(approver.as_uuid())
        .bind(reason)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_property()).transpose()
    }
}

impl TransactionRepository for PgAdminRepository {
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        page: &PageQuery,
    ) -> AdminResult<(Vec<TransactionEntry>, i64)> {
        fn apply_filters<'a>(
            builder: &mut QueryBuilder<'a, Postgres>,
            filter: &'a TransactionFilter,
        ) {
            if let Some(kind) = &filter.kind {
                builder.push(" AND t.kind = ").push_bind(kind);
            }
            if let Some(status) = &filter.status {
                builder.push(" AND t.status = ").push_bind(status);
            }
        }

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM transactions t WHERE TRUE");
        apply_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let (_, limit) = page.normalize();
        let mut query = QueryBuilder::new(
            "SELECT t.id, t.user_id, t.kind, t.status, t.amount, t.created_at, \
             u.email AS user_email, u.first_name AS user_first_name, \
             u.last_name AS user_last_name \
             FROM transactions t JOIN users u ON u.id = t.user_id WHERE TRUE",
        );
        apply_filters(&mut query, filter);
        query.push(" ORDER BY t.created_at DESC LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind(page.offset());

        let rows: Vec<TransactionRow> = query.build_query_as().fetch_all(&self.pool).await?;
        Ok((rows.into_iter().map(|r| r.into_entry()).collect(), total))
    }
}

impl DashboardRepository for PgAdminRepository {
    async fn dashboard_stats(&self) -> AdminResult<DashboardStats> {
        let (total_users, total_investors, total_sellers, total_staff, new_users_7d, pending_kyc_users): (i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE role = 'investor'),
                COUNT(*) FILTER (WHERE role = 'seller'),
                COUNT(*) FILTER (WHERE role IN ('staff', 'operations_manager')),
                COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '7 days'),
                COUNT(*) FILTER (WHERE kyc_status = 'pending')
            FROM users
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let (total_properties, active_properties, pending_properties): (i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE status = 'active'),
                    COUNT(*) FILTER (WHERE status = 'pending')
                FROM properties
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        let (total_invested, invested_7d, completed_volume): (Decimal, Decimal, Decimal) =
            sqlx::query_as(
                r#"
                SELECT
                    COALESCE(SUM(amount) FILTER (WHERE kind = 'investment'), 0),
                    COALESCE(SUM(amount) FILTER (
                        WHERE kind = 'investment'
                          AND created_at >= NOW() - INTERVAL '7 days'), 0),
                    COALESCE(SUM(amount) FILTER (WHERE status = 'completed'), 0)
                FROM transactions
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(DashboardStats {
            total_users,
            total_investors,
            total_sellers,
            total_staff,
            new_users_7d,
            pending_kyc_users,
            total_properties,
            active_properties,
            pending_properties,
            total_invested,
            invested_7d,
            completed_volume,
            generated_at: Utc::now(),
        })
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct PropertyRow {
    id: Uuid,
    seller_id: Uuid,
    title: String,
    description: Option<String>,
    city: String,
    total_value: Decimal,
    funding_target: Decimal,
    min_investment: Decimal,
    max_investment: Decimal,
    raised_amount: Decimal,
    status: String,
    rejection_reason: Option<String>,
    approved_by: Option<Uuid>,
    approved_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PropertyRow {
    fn into_property(self) -> AdminResult<Property> {
        let status = PropertyStatus::from_code(&self.status).ok_or_else(|| {
            AdminError::Internal(format!("unknown property status: {}", self.status))
        })?;

        Ok(Property {
            id: PropertyId::from_uuid(self.id),
            seller_id: UserId::from_uuid(self.seller_id),
            title: self.title,
            description: self.description,
            city: self.city,
            total_value: self.total_value,
            funding_target: self.funding_target,
            min_investment: self.min_investment,
            max_investment: self.max_investment,
            raised_amount: self.raised_amount,
            status,
            rejection_reason: self.rejection_reason,
            approved_by: self.approved_by.map(UserId::from_uuid),
            approved_at: self.approved_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PendingPropertyRow {
    #[sqlx(flatten)]
    property: PropertyRow,
    seller_email: String,
    seller_first_name: String,
    seller_last_name: String,
    seller_phone: Option<String>,
}

impl PendingPropertyRow {
    fn into_entry(self) -> AdminResult<PendingProperty> {
        let seller = SellerSummary {
            id: UserId::from_uuid(self.property.seller_id),
            email: self.seller_email,
            first_name: self.seller_first_name,
            last_name: self.seller_last_name,
            phone: self.seller_phone,
        };
        Ok(PendingProperty {
            property: self.property.into_property()?,
            seller,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    user_id: Uuid,
    kind: String,
    status: String,
    amount: Decimal,
    created_at: DateTime<Utc>,
    user_email: String,
    user_first_name: String,
    user_last_name: String,
}

impl TransactionRow {
    fn into_entry(self) -> TransactionEntry {
        TransactionEntry {
            transaction: Transaction {
                id: TransactionId::from_uuid(self.id),
                user_id: UserId::from_uuid(self.user_id),
                kind: self.kind,
                status: self.status,
                amount: self.amount,
                created_at: self.created_at,
            },
            user_email: self.user_email,
            user_first_name: self.user_first_name,
            user_last_name: self.user_last_name,
        }
    }
}
