//! Use-case tests over in-memory repository doubles.

use std::collections::HashMap;
use std::sync::Arc;

use auth::application::audit::{AuditTrail, Notifier};
use auth::application::config::AuthConfig;
use auth::domain::entity::audit_log::AuditLog;
use auth::domain::entity::notification::Notification;
use auth::domain::entity::user::User;
use auth::domain::repository::{
    AuditLogFilter, AuditLogRepository, NotificationRepository, UserListFilter, UserRepository,
};
use auth::domain::value_object::email::Email;
use auth::domain::value_object::kyc::{KycLevel, KycStatus};
use auth::domain::value_object::user_role::UserRole;
use auth::domain::value_object::user_status::UserStatus;
use auth::error::{AuthError, AuthResult};
use chrono::{Duration, Utc};
use kernel::id::{PropertyId, TransactionId, UserId};
use kernel::page::PageQuery;
use platform::password::{ClearTextPassword, verify_password};
use platform::token::DEFAULT_ACCESS_TTL_SECS;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::dashboard::AdminReports;
use crate::application::properties::PropertyModeration;
use crate::application::staff::{CreateStaffInput, CreateStaffUseCase};
use crate::application::users::{AdminContext, UpdateUserInput, UserAdministration};
use crate::domain::entity::property::Property;
use crate::domain::entity::transaction::Transaction;
use crate::domain::repository::{
    DashboardRepository, DashboardStats, PendingProperty, PropertyRepository, SellerSummary,
    TransactionEntry, TransactionFilter, TransactionRepository,
};
use crate::domain::value_object::property_status::PropertyStatus;
use crate::error::{AdminError, AdminResult};

// ============================================================================
// In-memory doubles
// ============================================================================

#[derive(Clone, Default)]
struct InMemoryUsers {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    audits: Arc<Mutex<Vec<AuditLog>>>,
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryUsers {
    async fn insert_user(&self, user: User) {
        self.users.lock().await.insert(user.id.into_uuid(), user);
    }

    async fn user(&self, id: &UserId) -> Option<User> {
        self.users.lock().await.get(id.as_uuid()).cloned()
    }
}

impl UserRepository for InMemoryUsers {
    async fn create(&self, user: &User) -> AuthResult<()> {
        self.users
            .lock()
            .await
            .insert(user.id.into_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.lock().await.get(user_id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.email == *email)
            .cloned())
    }

    async fn email_exists(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.users.lock().await.values().any(|u| u.email == *email))
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        self.users
            .lock()
            .await
            .insert(user.id.into_uuid(), user.clone());
        Ok(())
    }

    async fn update_password(&self, user_id: &UserId, password_hash: &str) -> AuthResult<()> {
        if let Some(user) = self.users.lock().await.get_mut(user_id.as_uuid()) {
            user.password_hash = password_hash.to_string();
        }
        Ok(())
    }

    async fn record_login(&self, user_id: &UserId) -> AuthResult<()> {
        if let Some(user) = self.users.lock().await.get_mut(user_id.as_uuid()) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn set_status(&self, user_id: &UserId, status: UserStatus) -> AuthResult<()> {
        if let Some(user) = self.users.lock().await.get_mut(user_id.as_uuid()) {
            user.status = status;
        }
        Ok(())
    }

    async fn apply_kyc_approval(&self, user_id: &UserId, level: KycLevel) -> AuthResult<()> {
        if let Some(user) = self.users.lock().await.get_mut(user_id.as_uuid()) {
            user.apply_kyc_approval(level);
        }
        Ok(())
    }

    async fn mark_kyc_rejected(&self, user_id: &UserId) -> AuthResult<()> {
        if let Some(user) = self.users.lock().await.get_mut(user_id.as_uuid()) {
            user.mark_kyc_rejected();
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: &UserListFilter,
        page: &PageQuery,
    ) -> AuthResult<(Vec<User>, i64)> {
        let users = self.users.lock().await;
        let mut matching: Vec<User> = users
            .values()
            .filter(|u| filter.role.is_none_or(|r| u.role == r))
            .filter(|u| filter.status.is_none_or(|s| u.status == s))
            .filter(|u| {
                filter.search.as_ref().is_none_or(|q| {
                    let q = q.to_lowercase();
                    u.email.as_str().contains(&q)
                        || u.first_name.to_lowercase().contains(&q)
                        || u.last_name.to_lowercase().contains(&q)
                })
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let (_, limit) = page.normalize();
        let paged = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(limit as usize)
            .collect();
        Ok((paged, total))
    }
}

impl AuditLogRepository for InMemoryUsers {
    async fn append(&self, entry: &AuditLog) -> AuthResult<()> {
        self.audits.lock().await.push(entry.clone());
        Ok(())
    }

    async fn list(
        &self,
        filter: &AuditLogFilter,
        page: &PageQuery,
    ) -> AuthResult<(Vec<AuditLog>, i64)> {
        let audits = self.audits.lock().await;
        let mut matching: Vec<AuditLog> = audits
            .iter()
            .filter(|e| filter.action.as_ref().is_none_or(|a| e.action == *a))
            .filter(|e| {
                filter
                    .entity_type
                    .as_ref()
                    .is_none_or(|t| e.entity_type == *t)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let (_, limit) = page.normalize();
        let paged = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(limit as usize)
            .collect();
        Ok((paged, total))
    }
}

impl NotificationRepository for InMemoryUsers {
    async fn push(&self, notification: &Notification) -> AuthResult<()> {
        self.notifications.lock().await.push(notification.clone());
        Ok(())
    }
}

#[derive(Clone)]
struct InMemoryAdminRepo {
    properties: Arc<Mutex<HashMap<Uuid, Property>>>,
    transactions: Arc<Mutex<Vec<Transaction>>>,
    users: InMemoryUsers,
}

impl InMemoryAdminRepo {
    fn new(users: InMemoryUsers) -> Self {
        Self {
            properties: Arc::new(Mutex::new(HashMap::new())),
            transactions: Arc::new(Mutex::new(Vec::new())),
            users,
        }
    }

    async fn insert_property(&self, property: Property) {
        self.properties
            .lock()
            .await
            .insert(property.id.into_uuid(), property);
    }

    async fn property(&self, id: &PropertyId) -> Option<Property> {
        self.properties.lock().await.get(id.as_uuid()).cloned()
    }

    async fn push_transaction(&self, tx: Transaction) {
        self.transactions.lock().await.push(tx);
    }
}

impl PropertyRepository for InMemoryAdminRepo {
    async fn find_property(&self, id: &PropertyId) -> AdminResult<Option<Property>> {
        Ok(self.properties.lock().await.get(id.as_uuid()).cloned())
    }

    async fn list_pending(
        &self,
        page: &PageQuery,
    ) -> AdminResult<(Vec<PendingProperty>, i64)> {
        let properties = self.properties.lock().await;
        let mut matching: Vec<Property> = properties
            .values()
            .filter(|p| p.is_pending())
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let total = matching.len() as i64;
        let (_, limit) = page.normalize();
        let mut entries = Vec::new();
        for property in matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(limit as usize)
        {
            let seller = self
                .users
                .user(&property.seller_id)
                .await
                .map(|u| SellerSummary {
                    id: u.id,
                    email: u.email.as_str().to_string(),
                    first_name: u.first_name,
                    last_name: u.last_name,
                    phone: u.phone,
                })
                .ok_or_else(|| AdminError::Internal("seller missing".to_string()))?;
            entries.push(PendingProperty { property, seller });
        }
        Ok((entries, total))
    }

    async fn activate_if_pending(
        &self,
        id: &PropertyId,
        approver: &UserId,
    ) -> AdminResult<Option<Property>> {
        let mut properties = self.properties.lock().await;
        let Some(property) = properties.get_mut(id.as_uuid()).filter(|p| p.is_pending()) else {
            return Ok(None);
        };
        property.status = PropertyStatus::Active;
        property.approved_by = Some(*approver);
        property.approved_at = Some(Utc::now());
        property.updated_at = Utc::now();
        Ok(Some(property.clone()))
    }

    async fn reject_if_pending(
        &self,
        id: &PropertyId,
        approver: &UserId,
        reason: Option<&str>,
    ) -> AdminResult<Option<Property>> {
        let mut properties = self.properties.lock().await;
        let Some(property) = properties.get_mut(id.as_uuid()).filter(|p| p.is_pending()) else {
            return Ok(None);
        };
        property.status = PropertyStatus::Rejected;
        property.rejection_reason = reason.map(str::to_string);
        property.approved_by = Some(*approver);
        property.updated_at = Utc::now();
        Ok(Some(property.clone()))
    }
}

impl TransactionRepository for InMemoryAdminRepo {
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        page: &PageQuery,
    ) -> AdminResult<(Vec<TransactionEntry>, i64)> {
        let transactions = self.transactions.lock().await;
        let mut matching: Vec<Transaction> = transactions
            .iter()
            .filter(|t| filter.kind.as_ref().is_none_or(|k| t.kind == *k))
            .filter(|t| filter.status.as_ref().is_none_or(|s| t.status == *s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let (_, limit) = page.normalize();
        let mut entries = Vec::new();
        for transaction in matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(limit as usize)
        {
            let user = self
                .users
                .user(&transaction.user_id)
                .await
                .ok_or_else(|| AdminError::Internal("user missing".to_string()))?;
            entries.push(TransactionEntry {
                transaction,
                user_email: user.email.as_str().to_string(),
                user_first_name: user.first_name,
                user_last_name: user.last_name,
            });
        }
        Ok((entries, total))
    }
}

impl DashboardRepository for InMemoryAdminRepo {
    async fn dashboard_stats(&self) -> AdminResult<DashboardStats> {
        let users = self.users.users.lock().await;
        let properties = self.properties.lock().await;
        let transactions = self.transactions.lock().await;
        let week_ago = Utc::now() - Duration::days(7);

        let mut stats = DashboardStats {
            generated_at: Utc::now(),
            ..DashboardStats::default()
        };
        for u in users.values() {
            stats.total_users += 1;
            match u.role {
                UserRole::Investor => stats.total_investors += 1,
                UserRole::Seller => stats.total_sellers += 1,
                UserRole::Staff | UserRole::OperationsManager => stats.total_staff += 1,
                _ => {}
            }
            if u.created_at >= week_ago {
                stats.new_users_7d += 1;
            }
            if u.kyc_status == KycStatus::Pending {
                stats.pending_kyc_users += 1;
            }
        }
        for p in properties.values() {
            stats.total_properties += 1;
            match p.status {
                PropertyStatus::Active => stats.active_properties += 1,
                PropertyStatus::Pending => stats.pending_properties += 1,
                PropertyStatus::Rejected => {}
            }
        }
        for t in transactions.iter() {
            if t.kind == "investment" {
                stats.total_invested += t.amount;
                if t.created_at >= week_ago {
                    stats.invested_7d += t.amount;
                }
            }
            if t.status == "completed" {
                stats.completed_volume += t.amount;
            }
        }
        Ok(stats)
    }
}

// ============================================================================
// Fixtures
// ============================================================================

const PRIMARY_ADMIN: &str = "admin@freip.com";

struct Harness {
    users: InMemoryUsers,
    repo: Arc<InMemoryAdminRepo>,
    audit: AuditTrail<InMemoryUsers>,
    notifier: Notifier<InMemoryUsers>,
    config: Arc<AuthConfig>,
}

fn setup() -> Harness {
    let users = InMemoryUsers::default();
    let repo = Arc::new(InMemoryAdminRepo::new(users.clone()));
    let shared = Arc::new(users.clone());
    Harness {
        users,
        repo,
        audit: AuditTrail::new(Arc::clone(&shared)),
        notifier: Notifier::new(shared),
        config: Arc::new(AuthConfig {
            jwt_secret: "test-secret".to_string(),
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            primary_admin_email: Email::new(PRIMARY_ADMIN).unwrap(),
            google_client_id: None,
        }),
    }
}

fn user_with_role(email: &str, role: UserRole) -> User {
    User::new_registered(
        Email::new(email).unwrap(),
        "hash".to_string(),
        "Ada".to_string(),
        "Lovelace".to_string(),
        None,
        role,
    )
}

fn pending_property(seller_id: UserId, title: &str, offset_secs: i64) -> Property {
    let at = Utc::now() + Duration::seconds(offset_secs);
    Property {
        id: PropertyId::new(),
        seller_id,
        title: title.to_string(),
        description: None,
        city: "Lisbon".to_string(),
        total_value: Decimal::new(500_000, 0),
        funding_target: Decimal::new(250_000, 0),
        min_investment: Decimal::new(100, 0),
        max_investment: Decimal::new(50_000, 0),
        raised_amount: Decimal::ZERO,
        status: PropertyStatus::Pending,
        rejection_reason: None,
        approved_by: None,
        approved_at: None,
        created_at: at,
        updated_at: at,
    }
}

fn transaction(user_id: UserId, kind: &str, status: &str, amount: i64) -> Transaction {
    Transaction {
        id: TransactionId::new(),
        user_id,
        kind: kind.to_string(),
        status: status.to_string(),
        amount: Decimal::new(amount, 0),
        created_at: Utc::now(),
    }
}

fn ctx(actor_id: UserId) -> AdminContext {
    AdminContext {
        actor_id,
        client_ip: Some("10.0.0.1".to_string()),
    }
}

fn user_admin(h: &Harness) -> UserAdministration<InMemoryUsers> {
    UserAdministration::new(
        Arc::new(h.users.clone()),
        h.audit.clone(),
        Arc::clone(&h.config),
    )
}

fn staff_use_case(h: &Harness) -> CreateStaffUseCase<InMemoryUsers> {
    CreateStaffUseCase::new(Arc::new(h.users.clone()), h.audit.clone())
}

fn moderation(h: &Harness) -> PropertyModeration<InMemoryAdminRepo, InMemoryUsers> {
    PropertyModeration::new(Arc::clone(&h.repo), h.audit.clone(), h.notifier.clone())
}

fn reports(h: &Harness) -> AdminReports<InMemoryAdminRepo, InMemoryUsers> {
    AdminReports::new(Arc::clone(&h.repo), Arc::new(h.users.clone()))
}

fn staff_input(role_id: &str) -> CreateStaffInput {
    CreateStaffInput {
        email: "staff@freip.com".to_string(),
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        phone: None,
        role_id: role_id.to_string(),
    }
}

// ============================================================================
// Staff provisioning
// ============================================================================

#[tokio::test]
async fn test_create_staff_rejects_non_staff_roles() {
    let h = setup();
    let actor = UserId::new();
    for role_id in ["admin", "investor", "seller", "appointment_setter", "ceo", ""] {
        let err = staff_use_case(&h)
            .execute(staff_input(role_id), ctx(actor))
            .await
            .unwrap_err();
        assert!(
            matches!(err, AdminError::InvalidStaffRole),
            "role {role_id:?} must be refused"
        );
    }
}

#[tokio::test]
async fn test_create_staff_provisions_verified_account() {
    let h = setup();
    let output = staff_use_case(&h)
        .execute(staff_input("operations_manager"), ctx(UserId::new()))
        .await
        .unwrap();

    let user = h.users.user(&output.user.id).await.unwrap();
    assert_eq!(user.role, UserRole::OperationsManager);
    assert_eq!(user.status, UserStatus::Active);
    assert_eq!(user.kyc_status, KycStatus::Verified);
    assert_eq!(user.kyc_level, KycLevel::MAX);
    assert!(user.staff_id.as_deref().unwrap().starts_with("STF-"));

    // The one-shot plaintext password must match the stored hash.
    let password = ClearTextPassword::new(output.temp_password).unwrap();
    assert!(verify_password(&password, &user.password_hash).unwrap());
}

#[tokio::test]
async fn test_create_staff_refuses_duplicate_email() {
    let h = setup();
    h.users
        .insert_user(user_with_role("staff@freip.com", UserRole::Investor))
        .await;

    let err = staff_use_case(&h)
        .execute(staff_input("staff"), ctx(UserId::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Auth(AuthError::EmailTaken)));
}

// ============================================================================
// User administration
// ============================================================================

#[tokio::test]
async fn test_update_merges_partial_fields() {
    let h = setup();
    let user = user_with_role("user@example.com", UserRole::Investor);
    let id = user.id;
    h.users.insert_user(user).await;

    let updated = user_admin(&h)
        .update(
            &id,
            UpdateUserInput {
                first_name: Some("Grace".to_string()),
                status: Some("suspended".to_string()),
                ..UpdateUserInput::default()
            },
            ctx(UserId::new()),
        )
        .await
        .unwrap();

    assert_eq!(updated.first_name, "Grace");
    assert_eq!(updated.last_name, "Lovelace");
    assert_eq!(updated.status, UserStatus::Suspended);
    assert_eq!(updated.role, UserRole::Investor);
}

#[tokio::test]
async fn test_update_rejects_unknown_role() {
    let h = setup();
    let user = user_with_role("user@example.com", UserRole::Investor);
    let id = user.id;
    h.users.insert_user(user).await;

    let err = user_admin(&h)
        .update(
            &id,
            UpdateUserInput {
                role: Some("superuser".to_string()),
                ..UpdateUserInput::default()
            },
            ctx(UserId::new()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Validation(_)));
}

#[tokio::test]
async fn test_primary_admin_update_needs_self() {
    let h = setup();
    let primary = user_with_role(PRIMARY_ADMIN, UserRole::Admin);
    let primary_id = primary.id;
    h.users.insert_user(primary).await;

    let input = || UpdateUserInput {
        first_name: Some("Changed".to_string()),
        ..UpdateUserInput::default()
    };

    // Another admin may not touch the primary account.
    let err = user_admin(&h)
        .update(&primary_id, input(), ctx(UserId::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::PrimaryAdminProtected));

    // The primary admin may modify their own account.
    let updated = user_admin(&h)
        .update(&primary_id, input(), ctx(primary_id))
        .await
        .unwrap();
    assert_eq!(updated.first_name, "Changed");
}

#[tokio::test]
async fn test_primary_admin_cannot_be_deactivated() {
    let h = setup();
    let primary = user_with_role(PRIMARY_ADMIN, UserRole::Admin);
    let primary_id = primary.id;
    h.users.insert_user(primary).await;

    // Not even by themselves.
    let err = user_admin(&h)
        .deactivate(&primary_id, ctx(primary_id))
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::PrimaryAdminProtected));

    let user = h.users.user(&primary_id).await.unwrap();
    assert_eq!(user.status, UserStatus::Active);
}

#[tokio::test]
async fn test_deactivate_suspends_account() {
    let h = setup();
    let user = user_with_role("user@example.com", UserRole::Seller);
    let id = user.id;
    h.users.insert_user(user).await;

    user_admin(&h).deactivate(&id, ctx(UserId::new())).await.unwrap();

    // Suspended, not deleted.
    let user = h.users.user(&id).await.unwrap();
    assert_eq!(user.status, UserStatus::Suspended);
}

#[tokio::test]
async fn test_list_rejects_bogus_filters() {
    let h = setup();
    let err = user_admin(&h)
        .list(Some("superuser"), None, None, &PageQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Validation(_)));

    let err = user_admin(&h)
        .list(None, Some("frozen"), None, &PageQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Validation(_)));
}

#[tokio::test]
async fn test_list_filters_by_role() {
    let h = setup();
    h.users
        .insert_user(user_with_role("a@example.com", UserRole::Investor))
        .await;
    h.users
        .insert_user(user_with_role("b@example.com", UserRole::Seller))
        .await;

    let (users, meta) = user_admin(&h)
        .list(Some("seller"), None, None, &PageQuery::default())
        .await
        .unwrap();
    assert_eq!(meta.total, 1);
    assert_eq!(users[0].email.as_str(), "b@example.com");
}

// ============================================================================
// Property moderation
// ============================================================================

#[tokio::test]
async fn test_decision_must_be_active_or_rejected() {
    let h = setup();
    let seller = user_with_role("seller@example.com", UserRole::Seller);
    let seller_id = seller.id;
    h.users.insert_user(seller).await;
    let property = pending_property(seller_id, "Riverside flat", 0);
    let id = property.id;
    h.repo.insert_property(property).await;

    for status in ["pending", "sold", ""] {
        let err = moderation(&h)
            .decide(&id, status, None, ctx(UserId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::InvalidPropertyStatus));
    }
}

#[tokio::test]
async fn test_activate_stamps_approver() {
    let h = setup();
    let seller = user_with_role("seller@example.com", UserRole::Seller);
    let seller_id = seller.id;
    h.users.insert_user(seller).await;
    let property = pending_property(seller_id, "Riverside flat", 0);
    let id = property.id;
    h.repo.insert_property(property).await;

    let admin_id = UserId::new();
    let updated = moderation(&h)
        .decide(&id, "active", None, ctx(admin_id))
        .await
        .unwrap();

    assert_eq!(updated.status, PropertyStatus::Active);
    assert_eq!(updated.approved_by, Some(admin_id));
    assert!(updated.approved_at.is_some());
}

#[tokio::test]
async fn test_reject_stores_reason() {
    let h = setup();
    let seller = user_with_role("seller@example.com", UserRole::Seller);
    let seller_id = seller.id;
    h.users.insert_user(seller).await;
    let property = pending_property(seller_id, "Riverside flat", 0);
    let id = property.id;
    h.repo.insert_property(property).await;

    let updated = moderation(&h)
        .decide(&id, "rejected", Some("Missing deed".to_string()), ctx(UserId::new()))
        .await
        .unwrap();

    assert_eq!(updated.status, PropertyStatus::Rejected);
    assert_eq!(updated.rejection_reason.as_deref(), Some("Missing deed"));
}

#[tokio::test]
async fn test_decided_property_cannot_be_redecided() {
    let h = setup();
    let seller = user_with_role("seller@example.com", UserRole::Seller);
    let seller_id = seller.id;
    h.users.insert_user(seller).await;
    let property = pending_property(seller_id, "Riverside flat", 0);
    let id = property.id;
    h.repo.insert_property(property).await;

    moderation(&h)
        .decide(&id, "active", None, ctx(UserId::new()))
        .await
        .unwrap();

    let err = moderation(&h)
        .decide(&id, "rejected", Some("Changed my mind".to_string()), ctx(UserId::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::PropertyAlreadyDecided));

    // The first decision stands.
    let property = h.repo.property(&id).await.unwrap();
    assert_eq!(property.status, PropertyStatus::Active);
}

#[tokio::test]
async fn test_unknown_property_not_found() {
    let h = setup();
    let err = moderation(&h)
        .decide(&PropertyId::new(), "active", None, ctx(UserId::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::PropertyNotFound));
}

#[tokio::test]
async fn test_pending_queue_is_oldest_first() {
    let h = setup();
    let seller = user_with_role("seller@example.com", UserRole::Seller);
    let seller_id = seller.id;
    h.users.insert_user(seller).await;

    let oldest = pending_property(seller_id, "First", -30);
    let newest = pending_property(seller_id, "Second", -10);
    let mut active = pending_property(seller_id, "Live", -40);
    active.status = PropertyStatus::Active;
    let expected = [oldest.id, newest.id];
    for p in [oldest, newest, active] {
        h.repo.insert_property(p).await;
    }

    let (entries, meta) = moderation(&h).pending(&PageQuery::default()).await.unwrap();
    assert_eq!(meta.total, 2);
    let ids: Vec<_> = entries.iter().map(|e| e.property.id).collect();
    assert_eq!(ids, expected);
    assert_eq!(entries[0].seller.email, "seller@example.com");
}

// ============================================================================
// Reporting
// ============================================================================

#[tokio::test]
async fn test_dashboard_counts() {
    let h = setup();
    let investor = user_with_role("a@example.com", UserRole::Investor);
    let investor_id = investor.id;
    h.users.insert_user(investor).await;
    h.users
        .insert_user(user_with_role("b@example.com", UserRole::Seller))
        .await;
    h.users
        .insert_user(user_with_role("c@example.com", UserRole::OperationsManager))
        .await;

    h.repo
        .insert_property(pending_property(investor_id, "One", 0))
        .await;
    h.repo
        .push_transaction(transaction(investor_id, "investment", "completed", 1_000))
        .await;
    h.repo
        .push_transaction(transaction(investor_id, "deposit", "completed", 500))
        .await;

    let stats = reports(&h).dashboard().await.unwrap();
    assert_eq!(stats.total_users, 3);
    assert_eq!(stats.total_investors, 1);
    assert_eq!(stats.total_sellers, 1);
    assert_eq!(stats.total_staff, 1);
    assert_eq!(stats.pending_properties, 1);
    assert_eq!(stats.total_invested, Decimal::new(1_000, 0));
    assert_eq!(stats.completed_volume, Decimal::new(1_500, 0));
}

#[tokio::test]
async fn test_transactions_filter_by_kind() {
    let h = setup();
    let user = user_with_role("a@example.com", UserRole::Investor);
    let user_id = user.id;
    h.users.insert_user(user).await;
    h.repo
        .push_transaction(transaction(user_id, "investment", "completed", 1_000))
        .await;
    h.repo
        .push_transaction(transaction(user_id, "withdrawal", "pending", 200))
        .await;

    let filter = TransactionFilter {
        kind: Some("investment".to_string()),
        status: None,
    };
    let (entries, meta) = reports(&h)
        .transactions(&filter, &PageQuery::default())
        .await
        .unwrap();
    assert_eq!(meta.total, 1);
    assert_eq!(entries[0].transaction.kind, "investment");
    assert_eq!(entries[0].user_email, "a@example.com");
}

#[tokio::test]
async fn test_audit_logs_filter_by_action() {
    let h = setup();
    let actor = UserId::new();
    let target = user_with_role("user@example.com", UserRole::Investor);
    let target_id = target.id;
    h.users.insert_user(target).await;

    user_admin(&h)
        .deactivate(&target_id, ctx(actor))
        .await
        .unwrap();
    // The audit write is fire-and-forget; let the spawned task land.
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let filter = AuditLogFilter {
        actor_id: None,
        action: Some("admin_deactivate_user".to_string()),
        entity_type: None,
    };
    let (entries, _) = reports(&h)
        .audit_logs(&filter, &PageQuery::default())
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "admin_deactivate_user");
    assert_eq!(entries[0].entity_id, Some(target_id.into_uuid()));
}
