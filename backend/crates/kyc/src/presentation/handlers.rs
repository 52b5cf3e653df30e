//! KYC HTTP Handlers

use std::sync::Arc;

use auth::application::audit::{AuditTrail, Notifier};
use auth::domain::repository::{AuditLogRepository, NotificationRepository, UserRepository};
use auth::presentation::middleware::{ClientIp, CurrentUser};
use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use kernel::id::KycVerificationId;
use uuid::Uuid;

use crate::application::approve::{ApproveVerificationUseCase, ReviewContext};
use crate::application::queries::KycQueries;
use crate::application::reject::RejectVerificationUseCase;
use crate::application::request_docs::{RequestDocumentsInput, RequestDocumentsUseCase};
use crate::domain::repository::KycVerificationRepository;
use crate::error::KycResult;
use crate::presentation::dto::{
    DecisionResponse, DetailResponse, QueueItemResponse, QueueQuery, QueueResponse, RejectRequest,
    RequestDocumentsRequest, StatsResponse, VerificationResponse,
};

/// Shared handler state
pub struct KycAppState<K, R>
where
    K: KycVerificationRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    pub kyc_repo: Arc<K>,
    pub users: Arc<R>,
    pub audit: AuditTrail<R>,
    pub notifier: Notifier<R>,
}

impl<K, R> Clone for KycAppState<K, R>
where
    K: KycVerificationRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            kyc_repo: Arc::clone(&self.kyc_repo),
            users: Arc::clone(&self.users),
            audit: self.audit.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

fn review_context(current: &CurrentUser, client_ip: Option<String>) -> ReviewContext {
    ReviewContext {
        actor_id: current.0.id,
        client_ip,
    }
}

/// GET /queue
pub async fn queue<K, R>(
    State(state): State<KycAppState<K, R>>,
    Query(query): Query<QueueQuery>,
) -> KycResult<Json<QueueResponse>>
where
    K: KycVerificationRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    let queries = KycQueries::new(Arc::clone(&state.kyc_repo));
    let page = query.page_query();
    let (entries, pagination) = queries.queue(query.status.as_deref(), &page).await?;

    Ok(Json(QueueResponse {
        verifications: entries.iter().map(QueueItemResponse::from).collect(),
        pagination,
    }))
}

/// GET /stats
pub async fn stats<K, R>(
    State(state): State<KycAppState<K, R>>,
) -> KycResult<Json<StatsResponse>>
where
    K: KycVerificationRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    let queries = KycQueries::new(Arc::clone(&state.kyc_repo));
    let stats = queries.stats().await?;
    Ok(Json(StatsResponse::from(&stats)))
}

/// GET /{id}
pub async fn detail<K, R>(
    State(state): State<KycAppState<K, R>>,
    Path(id): Path<Uuid>,
) -> KycResult<Json<DetailResponse>>
where
    K: KycVerificationRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    let queries = KycQueries::new(Arc::clone(&state.kyc_repo));
    let (detail, history) = queries.detail(&KycVerificationId::from_uuid(id)).await?;
    Ok(Json(DetailResponse::new(&detail, &history)))
}

/// POST /{id}/approve
pub async fn approve<K, R>(
    State(state): State<KycAppState<K, R>>,
    Extension(current): Extension<CurrentUser>,
    ClientIp(client_ip): ClientIp,
    Path(id): Path<Uuid>,
) -> KycResult<Json<DecisionResponse>>
where
    K: KycVerificationRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    let use_case = ApproveVerificationUseCase::new(
        Arc::clone(&state.kyc_repo),
        Arc::clone(&state.users),
        state.audit.clone(),
        state.notifier.clone(),
    );
    let updated = use_case
        .execute(
            &KycVerificationId::from_uuid(id),
            review_context(&current, client_ip),
        )
        .await?;

    Ok(Json(DecisionResponse {
        message: "KYC verification approved".to_string(),
        verification: VerificationResponse::from(&updated),
    }))
}

/// POST /{id}/reject
pub async fn reject<K, R>(
    State(state): State<KycAppState<K, R>>,
    Extension(current): Extension<CurrentUser>,
    ClientIp(client_ip): ClientIp,
    Path(id): Path<Uuid>,
    Json(body): Json<RejectRequest>,
) -> KycResult<Json<DecisionResponse>>
where
    K: KycVerificationRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    let use_case = RejectVerificationUseCase::new(
        Arc::clone(&state.kyc_repo),
        Arc::clone(&state.users),
        state.audit.clone(),
        state.notifier.clone(),
    );
    let updated = use_case
        .execute(
            &KycVerificationId::from_uuid(id),
            body.rejection_reason.as_deref().unwrap_or(""),
            review_context(&current, client_ip),
        )
        .await?;

    Ok(Json(DecisionResponse {
        message: "KYC verification rejected".to_string(),
        verification: VerificationResponse::from(&updated),
    }))
}

/// POST /{id}/request-docs
pub async fn request_docs<K, R>(
    State(state): State<KycAppState<K, R>>,
    Extension(current): Extension<CurrentUser>,
    ClientIp(client_ip): ClientIp,
    Path(id): Path<Uuid>,
    Json(body): Json<RequestDocumentsRequest>,
) -> KycResult<Json<DecisionResponse>>
where
    K: KycVerificationRepository + Send + Sync + 'static,
    R: UserRepository + AuditLogRepository + NotificationRepository + Clone + Send + Sync + 'static,
{
    let use_case = RequestDocumentsUseCase::new(
        Arc::clone(&state.kyc_repo),
        state.audit.clone(),
        state.notifier.clone(),
    );
    let updated = use_case
        .execute(
            &KycVerificationId::from_uuid(id),
            RequestDocumentsInput {
                message: body.message.unwrap_or_default(),
                required_documents: body.required_documents,
            },
            review_context(&current, client_ip),
        )
        .await?;

    Ok(Json(DecisionResponse {
        message: "Documents requested".to_string(),
        verification: VerificationResponse::from(&updated),
    }))
}
