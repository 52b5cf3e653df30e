//! Google Sign-In Use Case
//!
//! The provider ID token is verified server-side before any claim in it
//! is trusted. A first-seen email creates an account carrying the
//! `GOOGLE_OAUTH` sentinel in place of a password hash; later sign-ins
//! resolve to that account.

use std::sync::Arc;

use platform::token::{TokenPair, TokenService};
use serde_json::json;

use crate::application::audit::AuditTrail;
use crate::domain::entity::audit_log::AuditLog;
use crate::domain::entity::user::User;
use crate::domain::repository::{AuditLogRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::domain::value_object::user_role::UserRole;
use crate::domain::value_object::user_status::UserStatus;
use crate::error::{AuthError, AuthResult};

/// Claims extracted from a verified Google ID token.
#[derive(Debug, Clone)]
pub struct GoogleClaims {
    /// Google's stable subject identifier.
    pub sub: String,
    pub email: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

/// Verifies a Google ID token and returns its claims.
///
/// The production implementation checks the RS256 signature against
/// Google's published JWKS plus issuer and audience; tests substitute a
/// canned verifier.
#[trait_variant::make(IdTokenVerifier: Send)]
pub trait LocalIdTokenVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleClaims, String>;
}

/// Google sign-in input
pub struct GoogleSignInInput {
    pub id_token: String,
    /// Only meaningful when the account is created by this sign-in.
    pub role_id: Option<String>,
    pub client_ip: Option<String>,
}

/// Google sign-in output
pub struct GoogleSignInOutput {
    pub user: User,
    pub tokens: TokenPair,
    pub created: bool,
}

/// Google sign-in use case
pub struct GoogleSignInUseCase<U, A, V>
where
    U: UserRepository,
    A: AuditLogRepository + Send + Sync + 'static,
    V: IdTokenVerifier,
{
    user_repo: Arc<U>,
    audit: AuditTrail<A>,
    verifier: Arc<V>,
    tokens: TokenService,
}

impl<U, A, V> GoogleSignInUseCase<U, A, V>
where
    U: UserRepository,
    A: AuditLogRepository + Send + Sync + 'static,
    V: IdTokenVerifier,
{
    pub fn new(
        user_repo: Arc<U>,
        audit: AuditTrail<A>,
        verifier: Arc<V>,
        tokens: TokenService,
    ) -> Self {
        Self {
            user_repo,
            audit,
            verifier,
            tokens,
        }
    }

    pub async fn execute(&self, input: GoogleSignInInput) -> AuthResult<GoogleSignInOutput> {
        let claims = self
            .verifier
            .verify(&input.id_token)
            .await
            .map_err(AuthError::IdentityProvider)?;

        let email = Email::new(&claims.email)?;

        let (user, created) = match self.user_repo.find_by_email(&email).await? {
            Some(user) => {
                match user.status {
                    UserStatus::Active => {}
                    UserStatus::Suspended => return Err(AuthError::AccountSuspended),
                    UserStatus::Banned => return Err(AuthError::AccountBanned),
                }
                self.user_repo.record_login(&user.id).await?;
                (user, false)
            }
            None => {
                let role = match input.role_id.as_deref() {
                    None | Some("") => UserRole::Investor,
                    Some(code) => UserRole::from_code(code)
                        .filter(UserRole::can_self_register)
                        .ok_or(AuthError::InvalidRole(
                            "Invalid role. Only investor and seller accounts can register.",
                        ))?,
                };

                let user = User::new_oauth(
                    email,
                    claims.given_name.unwrap_or_default(),
                    claims.family_name.unwrap_or_default(),
                    role,
                );
                self.user_repo.create(&user).await?;
                (user, true)
            }
        };

        let action = if created {
            "google_register"
        } else {
            "google_login"
        };
        self.audit.record(
            AuditLog::new(action, "user")
                .actor(user.id)
                .entity(user.id.into_uuid())
                .new_values(json!({
                    "email": user.email.as_str(),
                    "provider_sub": claims.sub,
                }))
                .ip(input.client_ip),
        );

        let tokens = self
            .tokens
            .issue_pair(user.id.into_uuid(), user.role.code())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, created, "Google sign-in");

        Ok(GoogleSignInOutput {
            user,
            tokens,
            created,
        })
    }
}
