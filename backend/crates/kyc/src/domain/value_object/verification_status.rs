use serde::{Deserialize, Serialize};
use std::fmt;

/// Review workflow state of a single verification submission.
///
/// pending → under_review → approved | rejected. Approve and reject only
/// act on reviewable (non-terminal) records; a document request may
/// reopen a terminal record back to under_review as an appeal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

impl VerificationStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use VerificationStatus::*;
        match self {
            Pending => "pending",
            UnderReview => "under_review",
            Approved => "approved",
            Rejected => "rejected",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use VerificationStatus::*;
        match code {
            "pending" => Some(Pending),
            "under_review" => Some(UnderReview),
            "approved" => Some(Approved),
            "rejected" => Some(Rejected),
            _ => None,
        }
    }

    /// Terminal for approve/reject decisions.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        use VerificationStatus::*;
        matches!(self, Approved | Rejected)
    }

    #[inline]
    pub const fn is_reviewable(&self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        use VerificationStatus::*;
        for status in [Pending, UnderReview, Approved, Rejected] {
            assert_eq!(VerificationStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(VerificationStatus::from_code("verified"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!VerificationStatus::Pending.is_terminal());
        assert!(!VerificationStatus::UnderReview.is_terminal());
        assert!(VerificationStatus::Approved.is_terminal());
        assert!(VerificationStatus::Rejected.is_terminal());

        assert!(VerificationStatus::Pending.is_reviewable());
        assert!(!VerificationStatus::Approved.is_reviewable());
    }
}
