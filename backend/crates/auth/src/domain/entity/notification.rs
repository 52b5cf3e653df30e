//! Notification Entity
//!
//! In-app notifications pushed to users on workflow events (KYC decisions,
//! property reviews). Delivery is best-effort.

use chrono::{DateTime, Utc};
use kernel::id::{NotificationId, UserId};

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    /// Machine-readable kind, e.g. `kyc_approved`.
    pub kind: String,
    pub title: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: UserId,
        kind: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            user_id,
            kind: kind.into(),
            title: title.into(),
            message: message.into(),
            data: None,
            read: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_starts_unread() {
        let n = Notification::new(UserId::new(), "kyc_approved", "KYC Approved", "Done");
        assert!(!n.read);
        assert!(n.data.is_none());
    }
}
