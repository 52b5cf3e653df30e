//! KYC standing as recorded on the user account.
//!
//! The review workflow itself (pending / under review / approved / rejected
//! submissions) lives in the kyc crate; the user record only carries the
//! resulting status and the highest verified level.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregate KYC status on the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl KycStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use KycStatus::*;
        match self {
            Pending => "pending",
            Verified => "verified",
            Rejected => "rejected",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use KycStatus::*;
        match code {
            "pending" => Some(Pending),
            "verified" => Some(Verified),
            "rejected" => Some(Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for KycStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Verification tier, 1 through 3. Approvals only ever raise it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KycLevel(i32);

impl KycLevel {
    pub const MIN: KycLevel = KycLevel(1);
    pub const MAX: KycLevel = KycLevel(3);

    pub fn new(level: i32) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0).contains(&level).then_some(Self(level))
    }

    pub const fn value(&self) -> i32 {
        self.0
    }

    /// Merge in a newly approved level; the account level never goes down.
    pub fn raised_to(self, approved: KycLevel) -> KycLevel {
        self.max(approved)
    }
}

impl Default for KycLevel {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for KycLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
