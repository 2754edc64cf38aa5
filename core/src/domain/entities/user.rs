//! User entity representing a worker who logs time and receives remittances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account status of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    /// Convert to string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// User entity
///
/// Immutable once created except for `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Contact address used by notification collaborators
    pub contact: String,

    /// Whether the user takes part in settlement runs
    pub status: UserStatus,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last status change
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active user
    pub fn new(contact: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            contact: contact.into(),
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks if the user is active
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Deactivates the user
    pub fn deactivate(&mut self) {
        self.set_status(UserStatus::Inactive);
    }

    /// Re-activates the user
    pub fn activate(&mut self) {
        self.set_status(UserStatus::Active);
    }

    fn set_status(&mut self, status: UserStatus) {
        if self.status != status {
            self.status = status;
            self.updated_at = Utc::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_active() {
        let user = User::new("worker@example.com");
        assert!(user.is_active());
        assert_eq!(user.contact, "worker@example.com");
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_status_changes() {
        let mut user = User::new("worker@example.com");
        user.deactivate();
        assert_eq!(user.status, UserStatus::Inactive);
        assert!(!user.is_active());

        user.activate();
        assert!(user.is_active());
    }

    #[test]
    fn test_status_round_trip_through_storage_tag() {
        for status in [UserStatus::Active, UserStatus::Inactive] {
            assert_eq!(UserStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(UserStatus::parse("blocked"), None);
    }
}
