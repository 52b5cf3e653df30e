//! Data Transfer Objects
//!
//! Request/response shapes for the auth HTTP surface. Most fields are
//! snake_case; the camelCase exceptions (`refreshToken`, `googleToken`,
//! `currentPassword`, `newPassword`) are what the frontend sends.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::user::User;

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct GoogleSignInRequest {
    #[serde(rename = "googleToken")]
    pub google_token: String,
    #[serde(default)]
    pub role_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "currentPassword")]
    pub current_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

// ============================================================================
// Responses
// ============================================================================

/// User payload; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub status: String,
    pub kyc_status: String,
    pub kyc_level: i32,
    pub wallet_balance: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.into_uuid(),
            email: user.email.as_str().to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            role: user.role.code().to_string(),
            status: user.status.code().to_string(),
            kyc_status: user.kyc_status.code().to_string(),
            kyc_level: user.kyc_level.value(),
            wallet_balance: user.wallet_balance,
            staff_id: user.staff_id.clone(),
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// Login/register/google response: message + token pair + user.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{email::Email, user_role::UserRole};

    #[test]
    fn test_user_response_omits_password_hash() {
        let user = User::new_registered(
            Email::new("user@example.com").unwrap(),
            "secret-hash".to_string(),
            "Ada".to_string(),
            "Lovelace".to_string(),
            None,
            UserRole::Investor,
        );
        let body = serde_json::to_value(UserResponse::from(&user)).unwrap();
        assert!(body.get("password_hash").is_none());
        assert_eq!(body["role"], "investor");
        assert_eq!(body["kyc_status"], "pending");
        assert_eq!(body["kyc_level"], 1);
        // staff_id is absent, not null, for non-staff accounts
        assert!(body.get("staff_id").is_none());
    }

    #[test]
    fn test_camel_case_request_fields() {
        let req: RefreshRequest =
            serde_json::from_value(serde_json::json!({ "refreshToken": "abc" })).unwrap();
        assert_eq!(req.refresh_token, "abc");

        let req: ChangePasswordRequest = serde_json::from_value(serde_json::json!({
            "currentPassword": "old",
            "newPassword": "new"
        }))
        .unwrap();
        assert_eq!(req.current_password, "old");
        assert_eq!(req.new_password, "new");
    }
}
