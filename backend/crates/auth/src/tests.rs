//! Use-case tests over in-memory repository doubles.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::UserId;
use kernel::page::PageQuery;
use platform::token::{DEFAULT_ACCESS_TTL_SECS, TokenService};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::audit::AuditTrail;
use crate::application::change_password::{ChangePasswordInput, ChangePasswordUseCase};
use crate::application::google::{
    GoogleClaims, GoogleSignInInput, GoogleSignInUseCase, IdTokenVerifier,
};
use crate::application::login::{LoginInput, LoginUseCase};
use crate::application::refresh::RefreshUseCase;
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::domain::entity::audit_log::AuditLog;
use crate::domain::entity::notification::Notification;
use crate::domain::entity::user::User;
use crate::domain::repository::{
    AuditLogFilter, AuditLogRepository, NotificationRepository, UserListFilter, UserRepository,
};
use crate::domain::value_object::email::Email;
use crate::domain::value_object::kyc::{KycLevel, KycStatus};
use crate::domain::value_object::user_status::UserStatus;
use crate::error::{AuthError, AuthResult};

// ============================================================================
// In-memory doubles
// ============================================================================

#[derive(Clone, Default)]
pub(crate) struct InMemoryAuthRepo {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    audits: Arc<Mutex<Vec<AuditLog>>>,
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryAuthRepo {
    pub(crate) async fn insert_user(&self, user: User) {
        self.users.lock().await.insert(user.id.into_uuid(), user);
    }

    pub(crate) async fn user(&self, id: &UserId) -> Option<User> {
        self.users.lock().await.get(id.as_uuid()).cloned()
    }
}

impl UserRepository for InMemoryAuthRepo {
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
        Ok(self
            .users
            .lock()
            .await
            .values()
            .any(|u| u.email == *email))
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
            user.last_login_at = Some(chrono::Utc::now());
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

impl AuditLogRepository for InMemoryAuthRepo {
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
            .filter(|e| filter.actor_id.is_none_or(|id| e.actor_id == Some(id)))
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

impl NotificationRepository for InMemoryAuthRepo {
    async fn push(&self, notification: &Notification) -> AuthResult<()> {
        self.notifications.lock().await.push(notification.clone());
        Ok(())
    }
}

/// Verifier double returning canned claims, or an error for a magic token.
pub(crate) struct StaticVerifier {
    pub(crate) claims: GoogleClaims,
}

impl IdTokenVerifier for StaticVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleClaims, String> {
        if id_token == "bad-token" {
            return Err("token verification failed".to_string());
        }
        Ok(self.claims.clone())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn tokens() -> TokenService {
    TokenService::new("test-secret", DEFAULT_ACCESS_TTL_SECS)
}

fn setup() -> (Arc<InMemoryAuthRepo>, AuditTrail<InMemoryAuthRepo>, TokenService) {
    let repo = Arc::new(InMemoryAuthRepo::default());
    let audit = AuditTrail::new(Arc::clone(&repo));
    (repo, audit, tokens())
}

fn register_input(email: &str, role_id: &str) -> RegisterInput {
    RegisterInput {
        email: email.to_string(),
        password: "correct horse battery".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        phone: None,
        role_id: role_id.to_string(),
        client_ip: Some("203.0.113.7".to_string()),
    }
}

async fn register_user(
    repo: &Arc<InMemoryAuthRepo>,
    audit: &AuditTrail<InMemoryAuthRepo>,
    email: &str,
) -> User {
    let use_case = RegisterUseCase::new(Arc::clone(repo), audit.clone(), tokens());
    use_case
        .execute(register_input(email, "investor"))
        .await
        .unwrap()
        .user
}

// ============================================================================
// Register
// ============================================================================

#[tokio::test]
async fn test_register_investor_defaults() {
    let (repo, audit, svc) = setup();
    let use_case = RegisterUseCase::new(Arc::clone(&repo), audit, svc.clone());

    let output = use_case
        .execute(register_input("ada@example.com", "investor"))
        .await
        .unwrap();

    assert_eq!(output.user.kyc_status, KycStatus::Pending);
    assert_eq!(output.user.kyc_level, KycLevel::MIN);
    assert_eq!(output.user.status, UserStatus::Active);

    // Both halves of the pair verify against their own use.
    let claims = svc.verify_access(&output.tokens.access_token).unwrap();
    assert_eq!(claims.user_id().unwrap(), output.user.id.into_uuid());
    assert_eq!(claims.role, "investor");
    svc.verify_refresh(&output.tokens.refresh_token).unwrap();

    assert!(repo.user(&output.user.id).await.is_some());
}

#[tokio::test]
async fn test_register_rejects_privileged_roles() {
    let (repo, audit, svc) = setup();
    let use_case = RegisterUseCase::new(Arc::clone(&repo), audit, svc);

    for role in ["admin", "staff", "operations_manager", "nonsense"] {
        let result = use_case.execute(register_input("x@example.com", role)).await;
        assert!(matches!(result, Err(AuthError::InvalidRole(_))), "{role}");
    }
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let (repo, audit, svc) = setup();
    register_user(&repo, &audit, "ada@example.com").await;

    let use_case = RegisterUseCase::new(Arc::clone(&repo), audit, svc);
    let result = use_case
        .execute(register_input("Ada@Example.com", "seller"))
        .await;
    assert!(matches!(result, Err(AuthError::EmailTaken)));
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let (repo, audit, svc) = setup();
    let use_case = RegisterUseCase::new(Arc::clone(&repo), audit, svc);

    let mut input = register_input("ada@example.com", "investor");
    input.password = "short".to_string();
    assert!(matches!(
        use_case.execute(input).await,
        Err(AuthError::PasswordPolicy(_))
    ));
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_does_not_enumerate_accounts() {
    let (repo, audit, svc) = setup();
    register_user(&repo, &audit, "ada@example.com").await;

    let use_case = LoginUseCase::new(Arc::clone(&repo), audit, svc);

    let unknown = use_case
        .execute(LoginInput {
            email: "nobody@example.com".to_string(),
            password: "correct horse battery".to_string(),
            client_ip: None,
        })
        .await;
    let wrong_password = use_case
        .execute(LoginInput {
            email: "ada@example.com".to_string(),
            password: "wrong password!".to_string(),
            client_ip: None,
        })
        .await;

    assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
    assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_success_records_last_login() {
    let (repo, audit, svc) = setup();
    let user = register_user(&repo, &audit, "ada@example.com").await;
    assert!(user.last_login_at.is_none());

    let use_case = LoginUseCase::new(Arc::clone(&repo), audit, svc);
    let output = use_case
        .execute(LoginInput {
            email: "ada@example.com".to_string(),
            password: "correct horse battery".to_string(),
            client_ip: None,
        })
        .await
        .unwrap();

    assert!(output.user.last_login_at.is_some());
    assert!(repo.user(&user.id).await.unwrap().last_login_at.is_some());
}

#[tokio::test]
async fn test_login_blocked_for_suspended_and_banned() {
    let (repo, audit, svc) = setup();
    let user = register_user(&repo, &audit, "ada@example.com").await;
    let use_case = LoginUseCase::new(Arc::clone(&repo), audit, svc);

    let input = || LoginInput {
        email: "ada@example.com".to_string(),
        password: "correct horse battery".to_string(),
        client_ip: None,
    };

    repo.set_status(&user.id, UserStatus::Suspended).await.unwrap();
    assert!(matches!(
        use_case.execute(input()).await,
        Err(AuthError::AccountSuspended)
    ));

    repo.set_status(&user.id, UserStatus::Banned).await.unwrap();
    assert!(matches!(
        use_case.execute(input()).await,
        Err(AuthError::AccountBanned)
    ));
}

#[tokio::test]
async fn test_oauth_account_cannot_password_login() {
    let (repo, audit, svc) = setup();
    let user = User::new_oauth(
        Email::new("oauth@example.com").unwrap(),
        "Ada".to_string(),
        "Lovelace".to_string(),
        crate::domain::value_object::user_role::UserRole::Investor,
    );
    repo.insert_user(user).await;

    let use_case = LoginUseCase::new(Arc::clone(&repo), audit, svc);
    let result = use_case
        .execute(LoginInput {
            email: "oauth@example.com".to_string(),
            password: "GOOGLE_OAUTH".to_string(),
            client_ip: None,
        })
        .await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}

// ============================================================================
// Refresh
// ============================================================================

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let (repo, audit, svc) = setup();
    let user = register_user(&repo, &audit, "ada@example.com").await;

    let pair = svc.issue_pair(user.id.into_uuid(), "investor").unwrap();
    let use_case = RefreshUseCase::new(Arc::clone(&repo), svc);

    assert!(matches!(
        use_case.execute(&pair.access_token).await,
        Err(AuthError::InvalidRefreshToken)
    ));
    assert!(matches!(
        use_case.execute("not.a.jwt").await,
        Err(AuthError::InvalidRefreshToken)
    ));
}

#[tokio::test]
async fn test_refresh_rechecks_account_state() {
    let (repo, audit, svc) = setup();
    let user = register_user(&repo, &audit, "ada@example.com").await;
    let pair = svc.issue_pair(user.id.into_uuid(), "investor").unwrap();
    let use_case = RefreshUseCase::new(Arc::clone(&repo), svc.clone());

    // Works while active.
    let refreshed = use_case.execute(&pair.refresh_token).await.unwrap();
    svc.verify_access(&refreshed.tokens.access_token).unwrap();

    // Suspension cuts the session short even with a valid token.
    repo.set_status(&user.id, UserStatus::Suspended).await.unwrap();
    assert!(matches!(
        use_case.execute(&pair.refresh_token).await,
        Err(AuthError::AccountInactive)
    ));

    // A token whose subject no longer exists is rejected.
    let ghost_pair = svc.issue_pair(Uuid::new_v4(), "investor").unwrap();
    assert!(matches!(
        use_case.execute(&ghost_pair.refresh_token).await,
        Err(AuthError::UserNotFound)
    ));
}

// ============================================================================
// Google sign-in
// ============================================================================

fn google_claims(email: &str) -> GoogleClaims {
    GoogleClaims {
        sub: "google-sub-1".to_string(),
        email: email.to_string(),
        given_name: Some("Ada".to_string()),
        family_name: Some("Lovelace".to_string()),
    }
}

#[tokio::test]
async fn test_google_first_sign_in_creates_sentinel_account() {
    let (repo, audit, svc) = setup();
    let verifier = Arc::new(StaticVerifier {
        claims: google_claims("ada@example.com"),
    });
    let use_case =
        GoogleSignInUseCase::new(Arc::clone(&repo), audit.clone(), verifier, svc);

    let output = use_case
        .execute(GoogleSignInInput {
            id_token: "good-token".to_string(),
            role_id: None,
            client_ip: None,
        })
        .await
        .unwrap();

    assert!(output.created);
    assert!(output.user.is_oauth_account());
    assert_eq!(output.user.role.code(), "investor");
    assert_eq!(output.user.kyc_status, KycStatus::Pending);

    // Password changes are refused on the sentinel account.
    let change = ChangePasswordUseCase::new(Arc::clone(&repo), audit);
    let result = change
        .execute(
            &output.user,
            ChangePasswordInput {
                current_password: "whatever!".to_string(),
                new_password: "new password 123".to_string(),
                client_ip: None,
            },
        )
        .await;
    assert!(matches!(result, Err(AuthError::OAuthAccount)));
}

#[tokio::test]
async fn test_google_second_sign_in_reuses_account() {
    let (repo, audit, svc) = setup();
    let verifier = Arc::new(StaticVerifier {
        claims: google_claims("ada@example.com"),
    });
    let use_case = GoogleSignInUseCase::new(Arc::clone(&repo), audit, verifier, svc);

    let first = use_case
        .execute(GoogleSignInInput {
            id_token: "good-token".to_string(),
            role_id: Some("seller".to_string()),
            client_ip: None,
        })
        .await
        .unwrap();
    let second = use_case
        .execute(GoogleSignInInput {
            id_token: "good-token".to_string(),
            // Role is only meaningful at creation; ignored here.
            role_id: Some("investor".to_string()),
            client_ip: None,
        })
        .await
        .unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.user.id, second.user.id);
    assert_eq!(second.user.role.code(), "seller");
}

#[tokio::test]
async fn test_google_rejects_unverified_token() {
    let (repo, audit, svc) = setup();
    let verifier = Arc::new(StaticVerifier {
        claims: google_claims("ada@example.com"),
    });
    let use_case = GoogleSignInUseCase::new(Arc::clone(&repo), audit, verifier, svc);

    let result = use_case
        .execute(GoogleSignInInput {
            id_token: "bad-token".to_string(),
            role_id: None,
            client_ip: None,
        })
        .await;
    assert!(matches!(result, Err(AuthError::IdentityProvider(_))));
}

// ============================================================================
// Change password
// ============================================================================

#[tokio::test]
async fn test_change_password_requires_correct_current() {
    let (repo, audit, svc) = setup();
    let user = register_user(&repo, &audit, "ada@example.com").await;
    let stored = repo.user(&user.id).await.unwrap();

    let change = ChangePasswordUseCase::new(Arc::clone(&repo), audit.clone());
    let result = change
        .execute(
            &stored,
            ChangePasswordInput {
                current_password: "not the password".to_string(),
                new_password: "brand new password".to_string(),
                client_ip: None,
            },
        )
        .await;
    assert!(matches!(result, Err(AuthError::CurrentPasswordIncorrect)));

    change
        .execute(
            &stored,
            ChangePasswordInput {
                current_password: "correct horse battery".to_string(),
                new_password: "brand new password".to_string(),
                client_ip: None,
            },
        )
        .await
        .unwrap();

    // Old password no longer works, new one does.
    let login = LoginUseCase::new(Arc::clone(&repo), audit, svc);
    assert!(matches!(
        login
            .execute(LoginInput {
                email: "ada@example.com".to_string(),
                password: "correct horse battery".to_string(),
                client_ip: None,
            })
            .await,
        Err(AuthError::InvalidCredentials)
    ));
    login
        .execute(LoginInput {
            email: "ada@example.com".to_string(),
            password: "brand new password".to_string(),
            client_ip: None,
        })
        .await
        .unwrap();
}
