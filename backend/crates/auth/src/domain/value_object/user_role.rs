use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform roles, stored as their string code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    OperationsManager,
    Staff,
    Investor,
    Seller,
    AppointmentSetter,
}

impl UserRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Admin => "admin",
            OperationsManager => "operations_manager",
            Staff => "staff",
            Investor => "investor",
            Seller => "seller",
            AppointmentSetter => "appointment_setter",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code {
            "admin" => Some(Admin),
            "operations_manager" => Some(OperationsManager),
            "staff" => Some(Staff),
            "investor" => Some(Investor),
            "seller" => Some(Seller),
            "appointment_setter" => Some(AppointmentSetter),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Roles allowed to work the KYC review queue.
    #[inline]
    pub const fn can_review_kyc(&self) -> bool {
        use UserRole::*;
        matches!(self, Admin | OperationsManager)
    }

    /// Roles a user may pick for themselves at public registration.
    #[inline]
    pub const fn can_self_register(&self) -> bool {
        use UserRole::*;
        matches!(self, Investor | Seller)
    }

    /// Roles an admin may assign when provisioning internal accounts.
    #[inline]
    pub const fn is_provisionable_staff(&self) -> bool {
        use UserRole::*;
        matches!(self, Staff | OperationsManager)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_code_round_trip() {
        use UserRole::*;
        for role in [
            Admin,
            OperationsManager,
            Staff,
            Investor,
            Seller,
            AppointmentSetter,
        ] {
            assert_eq!(UserRole::from_code(role.code()), Some(role));
        }
        assert_eq!(UserRole::from_code("superuser"), None);
        assert_eq!(UserRole::from_code(""), None);
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::OperationsManager.to_string(), "operations_manager");
        assert_eq!(UserRole::Investor.to_string(), "investor");
    }

    #[test]
    fn test_user_role_checks() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::OperationsManager.is_admin());

        assert!(UserRole::Admin.can_review_kyc());
        assert!(UserRole::OperationsManager.can_review_kyc());
        assert!(!UserRole::Staff.can_review_kyc());
        assert!(!UserRole::Investor.can_review_kyc());

        assert!(UserRole::Investor.can_self_register());
        assert!(UserRole::Seller.can_self_register());
        assert!(!UserRole::Admin.can_self_register());
        assert!(!UserRole::Staff.can_self_register());

        assert!(UserRole::Staff.is_provisionable_staff());
        assert!(UserRole::OperationsManager.is_provisionable_staff());
        assert!(!UserRole::Admin.is_provisionable_staff());
        assert!(!UserRole::Seller.is_provisionable_staff());
    }
}
