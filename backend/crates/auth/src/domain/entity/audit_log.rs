//! Audit Log Entity
//!
//! Append-only record of sensitive actions. Writing an entry is
//! best-effort and must never fail the action it describes.

use chrono::{DateTime, Utc};
use kernel::id::{AuditLogId, UserId};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AuditLog {
    pub id: AuditLogId,
    /// Who performed the action; None for unauthenticated flows.
    pub actor_id: Option<UserId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(action: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            id: AuditLogId::new(),
            actor_id: None,
            action: action.into(),
            entity_type: entity_type.into(),
            entity_id: None,
            old_values: None,
            new_values: None,
            ip_address: None,
            created_at: Utc::now(),
        }
    }

    pub fn actor(mut self, actor_id: UserId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    pub fn entity(mut self, entity_id: Uuid) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    pub fn old_values(mut self, values: serde_json::Value) -> Self {
        self.old_values = Some(values);
        self
    }

    pub fn new_values(mut self, values: serde_json::Value) -> Self {
        self.new_values = Some(values);
        self
    }

    pub fn ip(mut self, ip: Option<String>) -> Self {
        self.ip_address = ip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_audit_log_builder() {
        let actor = UserId::new();
        let target = Uuid::new_v4();
        let entry = AuditLog::new("user_login", "user")
            .actor(actor)
            .entity(target)
            .new_values(json!({"email": "user@example.com"}))
            .ip(Some("203.0.113.7".to_string()));

        assert_eq!(entry.action, "user_login");
        assert_eq!(entry.entity_type, "user");
        assert_eq!(entry.actor_id, Some(actor));
        assert_eq!(entry.entity_id, Some(target));
        assert!(entry.old_values.is_none());
        assert_eq!(entry.ip_address.as_deref(), Some("203.0.113.7"));
    }
}
