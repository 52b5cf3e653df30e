use serde::{Deserialize, Serialize};
use std::fmt;

/// Account standing. Suspended accounts can be restored by an admin;
/// banned accounts cannot sign in at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
    Banned,
}

impl UserStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserStatus::*;
        match self {
            Active => "active",
            Suspended => "suspended",
            Banned => "banned",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use UserStatus::*;
        match code {
            "active" => Some(Active),
            "suspended" => Some(Suspended),
            "banned" => Some(Banned),
            _ => None,
        }
    }

    #[inline]
    pub const fn can_sign_in(&self) -> bool {
        matches!(self, UserStatus::Active)
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_status_code_round_trip() {
        use UserStatus::*;
        for status in [Active, Suspended, Banned] {
            assert_eq!(UserStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(UserStatus::from_code("deleted"), None);
    }

    #[test]
    fn test_only_active_can_sign_in() {
        assert!(UserStatus::Active.can_sign_in());
        assert!(!UserStatus::Suspended.can_sign_in());
        assert!(!UserStatus::Banned.can_sign_in());
    }
}
