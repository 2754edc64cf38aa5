//! Audit log entity recording every settlement attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Outcome recorded for a settlement attempt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Settled,
    Failed,
}

impl AuditAction {
    /// Convert to string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Settled => "settled",
            Self::Failed => "failed",
        }
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "settled" => Some(Self::Settled),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only record of one settlement attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditLog {
    /// Unique identifier for the log entry
    pub id: Uuid,

    /// Entity the attempt was made against (the worklog id)
    pub entity_id: Uuid,

    /// What happened
    pub action: AuditAction,

    /// Serialized context: amount, remittance id, error kind and message
    pub detail: JsonValue,

    /// Timestamp when the attempt was recorded
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    /// Create a new audit log entry with an empty detail object
    pub fn new(entity_id: Uuid, action: AuditAction) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity_id,
            action,
            detail: JsonValue::Object(Default::default()),
            created_at: Utc::now(),
        }
    }

    /// Replace the detail payload
    pub fn with_detail(mut self, detail: JsonValue) -> Self {
        self.detail = detail;
        self
    }

    /// Set a single key on the detail object
    pub fn with_field(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        if let JsonValue::Object(map) = &mut self.detail {
            map.insert(key.to_string(), value.into());
        } else {
            let mut map = serde_json::Map::new();
            map.insert(key.to_string(), value.into());
            self.detail = JsonValue::Object(map);
        }
        self
    }

    /// Set the recorded timestamp, used when rows are read back from storage
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn is_failure(&self) -> bool {
        self.action == AuditAction::Failed
    }
}
