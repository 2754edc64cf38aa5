//! No-op notifier implementation

use async_trait::async_trait;
use uuid::Uuid;

use wr_core::services::notification::{NotificationError, NotificationNotifier};

/// Notifier that discards every message
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotifier;

impl NoOpNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationNotifier for NoOpNotifier {
    async fn notify(&self, _user_id: Uuid, _message: &str) -> Result<(), NotificationError> {
        Ok(())
    }
}
