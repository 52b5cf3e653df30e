//! Auth HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use platform::token::TokenService;
use serde_json::json;

use crate::application::audit::AuditTrail;
use crate::application::change_password::{ChangePasswordInput, ChangePasswordUseCase};
use crate::application::config::AuthConfig;
use crate::application::google::{GoogleSignInInput, GoogleSignInUseCase, IdTokenVerifier};
use crate::application::login::{LoginInput, LoginUseCase};
use crate::application::refresh::RefreshUseCase;
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::domain::entity::audit_log::AuditLog;
use crate::domain::repository::{AuditLogRepository, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    AuthResponse, ChangePasswordRequest, GoogleSignInRequest, LoginRequest, MeResponse,
    MessageResponse, RefreshRequest, RegisterRequest, UserResponse,
};
use crate::presentation::middleware::{ClientIp, CurrentUser};

/// Shared handler state
pub struct AuthAppState<R, V>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
    V: IdTokenVerifier + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub verifier: Arc<V>,
    pub config: Arc<AuthConfig>,
    pub tokens: TokenService,
    pub audit: AuditTrail<R>,
}

impl<R, V> Clone for AuthAppState<R, V>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
    V: IdTokenVerifier + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            verifier: Arc::clone(&self.verifier),
            config: Arc::clone(&self.config),
            tokens: self.tokens.clone(),
            audit: self.audit.clone(),
        }
    }
}

/// POST /register
pub async fn register<R, V>(
    State(state): State<AuthAppState<R, V>>,
    ClientIp(client_ip): ClientIp,
    Json(body): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<AuthResponse>)>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
    V: IdTokenVerifier + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        Arc::clone(&state.repo),
        state.audit.clone(),
        state.tokens.clone(),
    );
    let output = use_case
        .execute(RegisterInput {
            email: body.email,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
            phone: body.phone,
            role_id: body.role_id,
            client_ip,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registration successful".to_string(),
            token: output.tokens.access_token,
            refresh_token: output.tokens.refresh_token,
            user: UserResponse::from(&output.user),
        }),
    ))
}

/// POST /login
pub async fn login<R, V>(
    State(state): State<AuthAppState<R, V>>,
    ClientIp(client_ip): ClientIp,
    Json(body): Json<LoginRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
    V: IdTokenVerifier + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        Arc::clone(&state.repo),
        state.audit.clone(),
        state.tokens.clone(),
    );
    let output = use_case
        .execute(LoginInput {
            email: body.email,
            password: body.password,
            client_ip,
        })
        .await?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token: output.tokens.access_token,
        refresh_token: output.tokens.refresh_token,
        user: UserResponse::from(&output.user),
    }))
}

/// POST /google
pub async fn google<R, V>(
    State(state): State<AuthAppState<R, V>>,
    ClientIp(client_ip): ClientIp,
    Json(body): Json<GoogleSignInRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
    V: IdTokenVerifier + Send + Sync + 'static,
{
    let use_case = GoogleSignInUseCase::new(
        Arc::clone(&state.repo),
        state.audit.clone(),
        Arc::clone(&state.verifier),
        state.tokens.clone(),
    );
    let output = use_case
        .execute(GoogleSignInInput {
            id_token: body.google_token,
            role_id: body.role_id,
            client_ip,
        })
        .await?;

    let message = if output.created {
        "Account created with Google"
    } else {
        "Login successful"
    };

    Ok(Json(AuthResponse {
        message: message.to_string(),
        token: output.tokens.access_token,
        refresh_token: output.tokens.refresh_token,
        user: UserResponse::from(&output.user),
    }))
}

/// POST /refresh
pub async fn refresh<R, V>(
    State(state): State<AuthAppState<R, V>>,
    Json(body): Json<RefreshRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
    V: IdTokenVerifier + Send + Sync + 'static,
{
    let use_case = RefreshUseCase::new(Arc::clone(&state.repo), state.tokens.clone());
    let output = use_case.execute(&body.refresh_token).await?;

    Ok(Json(AuthResponse {
        message: "Token refreshed".to_string(),
        token: output.tokens.access_token,
        refresh_token: output.tokens.refresh_token,
        user: UserResponse::from(&output.user),
    }))
}

/// GET /me
pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<MeResponse> {
    Json(MeResponse {
        user: UserResponse::from(current.0.as_ref()),
    })
}

/// POST /logout
///
/// Tokens are stateless, so this only leaves an audit trail; the client
/// discards its pair.
pub async fn logout<R, V>(
    State(state): State<AuthAppState<R, V>>,
    Extension(current): Extension<CurrentUser>,
    ClientIp(client_ip): ClientIp,
) -> Json<MessageResponse>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
    V: IdTokenVerifier + Send + Sync + 'static,
{
    state.audit.record(
        AuditLog::new("user_logout", "user")
            .actor(current.0.id)
            .entity(current.0.id.into_uuid())
            .new_values(json!({ "email": current.0.email.as_str() }))
            .ip(client_ip),
    );

    Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    })
}

/// POST /change-password
pub async fn change_password<R, V>(
    State(state): State<AuthAppState<R, V>>,
    Extension(current): Extension<CurrentUser>,
    ClientIp(client_ip): ClientIp,
    Json(body): Json<ChangePasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
    V: IdTokenVerifier + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(Arc::clone(&state.repo), state.audit.clone());
    use_case
        .execute(
            current.0.as_ref(),
            ChangePasswordInput {
                current_password: body.current_password,
                new_password: body.new_password,
                client_ip,
            },
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Password changed successfully".to_string(),
    }))
}
