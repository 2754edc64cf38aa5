//! Notifier trait for user-facing settlement messages

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Delivery failure reported by a notifier
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NotificationError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),

    #[error("Unknown recipient: {0}")]
    UnknownRecipient(Uuid),
}

/// Trait for notification delivery integration
///
/// Settlement never fails because of a notifier: errors are logged and
/// dropped by the caller.
#[async_trait]
pub trait NotificationNotifier: Send + Sync {
    /// Send a message to a user
    async fn notify(&self, user_id: Uuid, message: &str) -> Result<(), NotificationError>;
}
