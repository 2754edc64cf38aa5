//! Mock implementation of AuditLogRepository for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::domain::entities::AuditLog;
use crate::errors::DomainError;

use super::AuditLogRepository;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock implementation of AuditLogRepository for testing
pub struct MockAuditLogRepository {
    logs: Arc<Mutex<Vec<AuditLog>>>,
    should_fail: Arc<Mutex<bool>>,
    transient_failures: Arc<Mutex<u32>>,
    write_attempts: Arc<Mutex<u32>>,
}

impl MockAuditLogRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
            transient_failures: Arc::new(Mutex::new(0)),
            write_attempts: Arc::new(Mutex::new(0)),
        }
    }

    /// Set whether operations should fail with a non-retriable error
    pub fn set_should_fail(&self, should_fail: bool) {
        *lock(&self.should_fail) = should_fail;
    }

    /// Fail the next `count` writes with `TransientStorage`
    pub fn fail_next_writes(&self, count: u32) {
        *lock(&self.transient_failures) = count;
    }

    /// Number of write attempts seen, including failed ones
    pub fn write_attempts(&self) -> u32 {
        *lock(&self.write_attempts)
    }

    /// Get all stored logs for testing
    pub fn get_all_logs(&self) -> Vec<AuditLog> {
        lock(&self.logs).clone()
    }

    /// Append synchronously, applying the configured failures.
    ///
    /// Used by the mock worklog store so the settled row lands in the same
    /// critical section as the worklog update.
    pub fn append(&self, audit_log: &AuditLog) -> Result<(), DomainError> {
        *lock(&self.write_attempts) += 1;

        if *lock(&self.should_fail) {
            return Err(DomainError::Internal {
                message: "Mock repository error".to_string(),
            });
        }

        {
            let mut remaining = lock(&self.transient_failures);
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DomainError::TransientStorage {
                    message: "Mock audit write timed out".to_string(),
                });
            }
        }

        lock(&self.logs).push(audit_log.clone());
        Ok(())
    }
}

impl Default for MockAuditLogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditLogRepository for MockAuditLogRepository {
    async fn create(&self, audit_log: &AuditLog) -> Result<(), DomainError> {
        self.append(audit_log)
    }

    async fn find_by_entity(
        &self,
        entity_id: Uuid,
        limit: usize,
    ) -> Result<Vec<AuditLog>, DomainError> {
        if *lock(&self.should_fail) {
            return Err(DomainError::Internal {
                message: "Mock repository error".to_string(),
            });
        }

        let logs = lock(&self.logs);
        // Insertion order breaks timestamp ties so the newest append comes first.
        let mut result: Vec<AuditLog> = logs
            .iter()
            .rev()
            .filter(|log| log.entity_id == entity_id)
            .cloned()
            .collect();

        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result.truncate(limit);
        Ok(result)
    }

    async fn count_by_entity(&self, entity_id: Uuid) -> Result<usize, DomainError> {
        if *lock(&self.should_fail) {
            return Err(DomainError::Internal {
                message: "Mock repository error".to_string(),
            });
        }

        let logs = lock(&self.logs);
        Ok(logs.iter().filter(|log| log.entity_id == entity_id).count())
    }
}
