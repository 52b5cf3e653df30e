use serde::{Deserialize, Serialize};
use std::fmt;

/// Moderation state of a property listing.
///
/// pending → active | rejected, admin-gated; once a listing leaves
/// pending this workflow never moves it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    #[default]
    Pending,
    Active,
    Rejected,
}

impl PropertyStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use PropertyStatus::*;
        match self {
            Pending => "pending",
            Active => "active",
            Rejected => "rejected",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use PropertyStatus::*;
        match code {
            "pending" => Some(Pending),
            "active" => Some(Active),
            "rejected" => Some(Rejected),
            _ => None,
        }
    }

    /// A valid moderation decision target.
    #[inline]
    pub const fn is_decision(&self) -> bool {
        use PropertyStatus::*;
        matches!(self, Active | Rejected)
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        use PropertyStatus::*;
        for status in [Pending, Active, Rejected] {
            assert_eq!(PropertyStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(PropertyStatus::from_code("approved"), None);
    }

    #[test]
    fn test_decision_targets() {
        assert!(!PropertyStatus::Pending.is_decision());
        assert!(PropertyStatus::Active.is_decision());
        assert!(PropertyStatus::Rejected.is_decision());
    }
}
