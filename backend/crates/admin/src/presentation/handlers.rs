//! Admin HTTP Handlers

use std::sync::Arc;

use auth::application::audit::{AuditTrail, Notifier};
use auth::application::config::AuthConfig;
use auth::domain::repository::{
    AuditLogFilter, AuditLogRepository, NotificationRepository, UserRepository,
};
use auth::models::{MessageResponse, UserResponse};
use auth::presentation::middleware::{ClientIp, CurrentUser};
use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use kernel::id::{PropertyId, UserId};

use crate::application::dashboard::AdminReports;
use crate::application::properties::PropertyModeration;
use crate::application::staff::{CreateStaffInput, CreateStaffUseCase};
use crate::application::users::{AdminContext, UpdateUserInput, UserAdministration};
use crate::domain::repository::{
    DashboardRepository, PropertyRepository, TransactionFilter, TransactionRepository,
};
use crate::error::AdminResult;
use crate::presentation::dto::{
    AuditLogResponse, AuditLogsQuery, AuditLogsResponse, CreateStaffRequest, DashboardResponse,
    PageParams, PendingPropertiesResponse, PendingPropertyResponse, PropertyDecisionResponse,
    PropertyResponse, PropertyStatusRequest, StaffCreatedResponse, TransactionResponse,
    TransactionsQuery, TransactionsResponse, UpdateUserRequest, UserDetailResponse, UsersQuery,
    UsersResponse,
};

/// Shared handler state
pub struct AdminAppState<P, R>
where
    P: PropertyRepository + TransactionRepository + DashboardRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<P>,
    pub users: Arc<R>,
    pub audit: AuditTrail<R>,
    pub notifier: Notifier<R>,
    pub config: Arc<AuthConfig>,
}

impl<P, R> Clone for AdminAppState<P, R>
where
    P: PropertyRepository + TransactionRepository + DashboardRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            users: Arc::clone(&self.users),
            audit: self.audit.clone(),
            notifier: self.notifier.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

fn admin_context(current: &CurrentUser, client_ip: Option<String>) -> AdminContext {
    AdminContext {
        actor_id: current.0.id,
        client_ip,
    }
}

/// GET /dashboard
pub async fn dashboard<P, R>(
    State(state): State<AdminAppState<P, R>>,
) -> AdminResult<Json<DashboardResponse>>
where
    P: PropertyRepository + TransactionRepository + DashboardRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    let reports = AdminReports::new(Arc::clone(&state.repo), Arc::clone(&state.users));
    let stats = reports.dashboard().await?;
    Ok(Json(DashboardResponse::from(&stats)))
}

/// GET /users
pub async fn list_users<P, R>(
    State(state): State<AdminAppState<P, R>>,
    Query(query): Query<UsersQuery>,
) -> AdminResult<Json<UsersResponse>>
where
    P: PropertyRepository + TransactionRepository + DashboardRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    let admin = UserAdministration::new(
        Arc::clone(&state.users),
        state.audit.clone(),
        Arc::clone(&state.config),
    );
    let page = query.page_query();
    let (users, pagination) = admin
        .list(
            query.role.as_deref(),
            query.status.as_deref(),
            query.search.clone(),
            &page,
        )
        .await?;

    Ok(Json(UsersResponse {
        users: users.iter().map(UserResponse::from).collect(),
        pagination,
    }))
}

/// GET /users/{id}
pub async fn get_user<P, R>(
    State(state): State<AdminAppState<P, R>>,
    Path(id): Path<uuid::Uuid>,
) -> AdminResult<Json<UserDetailResponse>>
where
    P: PropertyRepository + TransactionRepository + DashboardRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    let admin = UserAdministration::new(
        Arc::clone(&state.users),
        state.audit.clone(),
        Arc::clone(&state.config),
    );
    let user = admin.get(&UserId::from_uuid(id)).await?;
    Ok(Json(UserDetailResponse {
        user: UserResponse::from(&user),
    }))
}

/// POST /users
pub async fn create_staff<P, R>(
    State(state): State<AdminAppState<P, R>>,
    Extension(current): Extension<CurrentUser>,
    ClientIp(client_ip): ClientIp,
    Json(body): Json<CreateStaffRequest>,
) -> AdminResult<(StatusCode, Json<StaffCreatedResponse>)>
where
    P: PropertyRepository + TransactionRepository + DashboardRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    let use_case = CreateStaffUseCase::new(Arc::clone(&state.users), state.audit.clone());
    let output = use_case
        .execute(
            CreateStaffInput {
                email: body.email,
                first_name: body.first_name,
                last_name: body.last_name,
                phone: body.phone,
                role_id: body.role_id,
            },
            admin_context(&current, client_ip),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(StaffCreatedResponse {
            message: "Staff account created".to_string(),
            user: UserResponse::from(&output.user),
            temporary_password: output.temp_password,
            note: "Share this temporary password securely. It is shown only once \
                   and should be changed on first login."
                .to_string(),
        }),
    ))
}

/// PUT /users/{id}
pub async fn update_user<P, R>(
    State(state): State<AdminAppState<P, R>>,
    Extension(current): Extension<CurrentUser>,
    ClientIp(client_ip): ClientIp,
    Path(id): Path<uuid::Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> AdminResult<Json<UserDetailResponse>>
where
    P: PropertyRepository + TransactionRepository + DashboardRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    let admin = UserAdministration::new(
        Arc::clone(&state.users),
        state.audit.clone(),
        Arc::clone(&state.config),
    );
    let user = admin
        .update(
            &UserId::from_uuid(id),
            UpdateUserInput {
                first_name: body.first_name,
                last_name: body.last_name,
                phone: body.phone,
                role: body.role,
                status: body.status,
            },
            admin_context(&current, client_ip),
        )
        .await?;

    Ok(Json(UserDetailResponse {
        user: UserResponse::from(&user),
    }))
}

/// DELETE /users/{id}
pub async fn deactivate_user<P, R>(
    State(state): State<AdminAppState<P, R>>,
    Extension(current): Extension<CurrentUser>,
    ClientIp(client_ip): ClientIp,
    Path(id): Path<uuid::Uuid>,
) -> AdminResult<Json<MessageResponse>>
where
    P: PropertyRepository + TransactionRepository + DashboardRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    let admin = UserAdministration::new(
        Arc::clone(&state.users),
        state.audit.clone(),
        Arc::clone(&state.config),
    );
    admin
        .deactivate(&UserId::from_uuid(id), admin_context(&current, client_ip))
        .await?;

    Ok(Json(MessageResponse {
        message: "User deactivated successfully".to_string(),
    }))
}

/// GET /properties/pending
pub async fn pending_properties<P, R>(
    State(state): State<AdminAppState<P, R>>,
    Query(query): Query<PageParams>,
) -> AdminResult<Json<PendingPropertiesResponse>>
where
    P: PropertyRepository + TransactionRepository + DashboardRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    let moderation = PropertyModeration::new(
        Arc::clone(&state.repo),
        state.audit.clone(),
        state.notifier.clone(),
    );
    let page = query.page_query();
    let (properties, pagination) = moderation.pending(&page).await?;

    Ok(Json(PendingPropertiesResponse {
        properties: properties.iter().map(PendingPropertyResponse::from).collect(),
        pagination,
    }))
}

/// PUT /properties/{id}/status
pub async fn update_property_status<P, R>(
    State(state): State<AdminAppState<P, R>>,
    Extension(current): Extension<CurrentUser>,
    ClientIp(client_ip): ClientIp,
    Path(id): Path<uuid::Uuid>,
    Json(body): Json<PropertyStatusRequest>,
) -> AdminResult<Json<PropertyDecisionResponse>>
where
    P: PropertyRepository + TransactionRepository + DashboardRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    let moderation = PropertyModeration::new(
        Arc::clone(&state.repo),
        state.audit.clone(),
        state.notifier.clone(),
    );
    let property = moderation
        .decide(
            &PropertyId::from_uuid(id),
            &body.status,
            body.reason,
            admin_context(&current, client_ip),
        )
        .await?;

    let message = match property.status {
        crate::domain::value_object::PropertyStatus::Active => "Property approved",
        _ => "Property rejected",
    };
    Ok(Json(PropertyDecisionResponse {
        message: message.to_string(),
        property: PropertyResponse::from(&property),
    }))
}

/// GET /transactions
pub async fn transactions<P, R>(
    State(state): State<AdminAppState<P, R>>,
    Query(query): Query<TransactionsQuery>,
) -> AdminResult<Json<TransactionsResponse>>
where
    P: PropertyRepository + TransactionRepository + DashboardRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    let reports = AdminReports::new(Arc::clone(&state.repo), Arc::clone(&state.users));
    let page = query.page_query();
    let filter = TransactionFilter {
        kind: query.kind.clone().filter(|s| !s.is_empty()),
        status: query.status.clone().filter(|s| !s.is_empty()),
    };
    let (entries, pagination) = reports.transactions(&filter, &page).await?;

    Ok(Json(TransactionsResponse {
        transactions: entries.iter().map(TransactionResponse::from).collect(),
        pagination,
    }))
}

/// GET /audit-logs
pub async fn audit_logs<P, R>(
    State(state): State<AdminAppState<P, R>>,
    Query(query): Query<AuditLogsQuery>,
) -> AdminResult<Json<AuditLogsResponse>>
where
    P: PropertyRepository + TransactionRepository + DashboardRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    let reports = AdminReports::new(Arc::clone(&state.repo), Arc::clone(&state.users));
    let page = query.page_query();
    let filter = AuditLogFilter {
        actor_id: None,
        action: query.action.clone().filter(|s| !s.is_empty()),
        entity_type: query.entity_type.clone().filter(|s| !s.is_empty()),
    };
    let (entries, pagination) = reports.audit_logs(&filter, &page).await?;

    Ok(Json(AuditLogsResponse {
        logs: entries.iter().map(AuditLogResponse::from).collect(),
        pagination,
    }))
}
