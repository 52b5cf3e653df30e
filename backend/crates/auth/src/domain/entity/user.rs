//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use rust_decimal::Decimal;

use crate::domain::value_object::email::Email;
use crate::domain::value_object::kyc::{KycLevel, KycStatus};
use crate::domain::value_object::user_role::UserRole;
use crate::domain::value_object::user_status::UserStatus;

/// Placeholder stored in `password_hash` for accounts created through
/// Google sign-in. It is not a valid Argon2 hash, so password login
/// against such an account can never verify.
pub const OAUTH_PASSWORD_SENTINEL: &str = "GOOGLE_OAUTH";

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub kyc_status: KycStatus,
    pub kyc_level: KycLevel,
    pub wallet_balance: Decimal,
    /// Human-readable identifier, set only on provisioned staff accounts.
    pub staff_id: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A self-registered account (investor or seller), KYC pending at level 1.
    pub fn new_registered(
        email: Email,
        password_hash: String,
        first_name: String,
        last_name: String,
        phone: Option<String>,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email,
            password_hash,
            first_name,
            last_name,
            phone,
            role,
            status: UserStatus::Active,
            kyc_status: KycStatus::Pending,
            kyc_level: KycLevel::MIN,
            wallet_balance: Decimal::ZERO,
            staff_id: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// An account created on first Google sign-in; no local password.
    pub fn new_oauth(
        email: Email,
        first_name: String,
        last_name: String,
        role: UserRole,
    ) -> Self {
        Self::new_registered(
            email,
            OAUTH_PASSWORD_SENTINEL.to_string(),
            first_name,
            last_name,
            None,
            role,
        )
    }

    /// An internal account provisioned by an admin. Staff skip the KYC
    /// funnel entirely: created active, verified, at the highest level.
    pub fn new_staff(
        email: Email,
        password_hash: String,
        first_name: String,
        last_name: String,
        phone: Option<String>,
        role: UserRole,
        staff_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email,
            password_hash,
            first_name,
            last_name,
            phone,
            role,
            status: UserStatus::Active,
            kyc_status: KycStatus::Verified,
            kyc_level: KycLevel::MAX,
            wallet_balance: Decimal::ZERO,
            staff_id: Some(staff_id),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_oauth_account(&self) -> bool {
        self.password_hash == OAUTH_PASSWORD_SENTINEL
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Apply an approved verification: status becomes verified and the
    /// level is raised (never lowered) to the approved submission's level.
    pub fn apply_kyc_approval(&mut self, approved_level: KycLevel) {
        self.kyc_status = KycStatus::Verified;
        self.kyc_level = self.kyc_level.raised_to(approved_level);
        self.updated_at = Utc::now();
    }

    /// Record a rejected verification. The level is left untouched.
    pub fn mark_kyc_rejected(&mut self) {
        self.kyc_status = KycStatus::Rejected;
        self.updated_at = Utc::now();
    }
}
