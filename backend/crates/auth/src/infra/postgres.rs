//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{AuditLogId, UserId};
use kernel::page::PageQuery;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::entity::{audit_log::AuditLog, notification::Notification, user::User};
use crate::domain::repository::{
    AuditLogFilter, AuditLogRepository, NotificationRepository, UserListFilter, UserRepository,
};
use crate::domain::value_object::{
    email::Email, kyc::KycLevel, kyc::KycStatus, user_role::UserRole, user_status::UserStatus,
};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, phone, \
     role, status, kyc_status, kyc_level, wallet_balance, staff_id, \
     last_login_at, created_at, updated_at";

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, password_hash, first_name, last_name, phone,
                role, status, kyc_status, kyc_level, wallet_balance, staff_id,
                last_login_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(user.role.code())
        .bind(user.status.code())
        .bind(user.kyc_status.code())
        .bind(user.kyc_level.value())
        .bind(user.wallet_balance)
        .bind(&user.staff_id)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn email_exists(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                first_name = $2,
                last_name = $3,
                phone = $4,
                role = $5,
                status = $6,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(user.role.code())
        .bind(user.status.code())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_password(&self, user_id: &UserId, password_hash: &str) -> AuthResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id.as_uuid())
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn record_login(&self, user_id: &UserId) -> AuthResult<()> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_status(&self, user_id: &UserId, status: UserStatus) -> AuthResult<()> {
        sqlx::query("UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id.as_uuid())
            .bind(status.code())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn apply_kyc_approval(&self, user_id: &UserId, level: KycLevel) -> AuthResult<()> {
        // GREATEST keeps the level monotone under concurrent approvals.
        sqlx::query(
            r#"
            UPDATE users SET
                kyc_status = 'verified',
                kyc_level = GREATEST(kyc_level, $2),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(level.value())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_kyc_rejected(&self, user_id: &UserId) -> AuthResult<()> {
        sqlx::query("UPDATE users SET kyc_status = 'rejected', updated_at = NOW() WHERE id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list(
        &self,
        filter: &UserListFilter,
        page: &PageQuery,
    ) -> AuthResult<(Vec<User>, i64)> {
        fn apply_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserListFilter) {
            if let Some(role) = filter.role {
                qb.push(" AND role = ").push_bind(role.code());
            }
            if let Some(status) = filter.status {
                qb.push(" AND status = ").push_bind(status.code());
            }
            if let Some(search) = &filter.search {
                let pattern = format!("%{}%", search.trim());
                qb.push(" AND (email ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR first_name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR last_name ILIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
        }

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM users WHERE TRUE");
        apply_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let (_, limit) = page.normalize();
        let mut qb =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE TRUE"));
        apply_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<UserRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        let users = rows
            .into_iter()
            .map(|r| r.into_user())
            .collect::<AuthResult<Vec<_>>>()?;

        Ok((users, total))
    }
}

// ============================================================================
// Audit Log Repository Implementation
// ============================================================================

impl AuditLogRepository for PgAuthRepository {
    async fn append(&self, entry: &AuditLog) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (
                id, actor_id, action, entity_type, entity_id,
                old_values, new_values, ip_address, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(entry.actor_id.map(|id| id.into_uuid()))
        .bind(&entry.action)
        .bind(&entry.entity_type)
        .bind(entry.entity_id)
        .bind(&entry.old_values)
        .bind(&entry.new_values)
        .bind(&entry.ip_address)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(
        &self,
        filter: &AuditLogFilter,
        page: &PageQuery,
    ) -> AuthResult<(Vec<AuditLog>, i64)> {
        fn apply_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &AuditLogFilter) {
            if let Some(actor_id) = filter.actor_id {
                qb.push(" AND actor_id = ").push_bind(actor_id.into_uuid());
            }
            if let Some(action) = &filter.action {
                qb.push(" AND action = ").push_bind(action.clone());
            }
            if let Some(entity_type) = &filter.entity_type {
                qb.push(" AND entity_type = ").push_bind(entity_type.clone());
            }
        }

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM audit_logs WHERE TRUE");
        apply_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let (_, limit) = page.normalize();
        let mut qb = QueryBuilder::new(
            "SELECT id, actor_id, action, entity_type, entity_id, \
             old_values, new_values, ip_address, created_at \
             FROM audit_logs WHERE TRUE",
        );
        apply_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<AuditLogRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        let entries = rows.into_iter().map(AuditLogRow::into_entry).collect();

        Ok((entries, total))
    }
}

// ============================================================================
// Notification Repository Implementation
// ============================================================================

impl NotificationRepository for PgAuthRepository {
    async fn push(&self, notification: &Notification) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                id, user_id, kind, title, message, data, read, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(notification.id.as_uuid())
        .bind(notification.user_id.as_uuid())
        .bind(&notification.kind)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(&notification.data)
        .bind(notification.read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    phone: Option<String>,
    role: String,
    status: String,
    kyc_status: String,
    kyc_level: i32,
    wallet_balance: Decimal,
    staff_id: Option<String>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let role = UserRole::from_code(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("unknown role code: {}", self.role)))?;
        let status = UserStatus::from_code(&self.status)
            .ok_or_else(|| AuthError::Internal(format!("unknown status code: {}", self.status)))?;
        let kyc_status = KycStatus::from_code(&self.kyc_status).ok_or_else(|| {
            AuthError::Internal(format!("unknown kyc_status code: {}", self.kyc_status))
        })?;
        let kyc_level = KycLevel::new(self.kyc_level)
            .ok_or_else(|| AuthError::Internal(format!("kyc_level out of range: {}", self.kyc_level)))?;

        Ok(User {
            id: UserId::from_uuid(self.id),
            email: Email::from_db(self.email),
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            role,
            status,
            kyc_status,
            kyc_level,
            wallet_balance: self.wallet_balance,
            staff_id: self.staff_id,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AuditLogRow {
    id: Uuid,
    actor_id: Option<Uuid>,
    action: String,
    entity_type: String,
    entity_id: Option<Uuid>,
    old_values: Option<serde_json::Value>,
    new_values: Option<serde_json::Value>,
    ip_address: Option<String>,
    created_at: DateTime<Utc>,
}

impl AuditLogRow {
    fn into_entry(self) -> AuditLog {
        AuditLog {
            id: AuditLogId::from_uuid(self.id),
            actor_id: self.actor_id.map(UserId::from_uuid),
            action: self.action,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            old_values: self.old_values,
            new_values: self.new_values,
            ip_address: self.ip_address,
            created_at: self.created_at,
        }
    }
}
