//! Notifier that writes messages to the tracing log instead of delivering them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use wr_core::services::notification::{NotificationError, NotificationNotifier};

/// Logs each notification and counts them
#[derive(Clone, Default)]
pub struct LoggingNotifier {
    message_count: Arc<AtomicU64>,
}

impl LoggingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of messages logged
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationNotifier for LoggingNotifier {
    async fn notify(&self, user_id: Uuid, message: &str) -> Result<(), NotificationError> {
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        info!(user_id = %user_id, count, "Notification: {}", message);
        Ok(())
    }
}
