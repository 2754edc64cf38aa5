//! Audit log repository trait defining the interface for audit log persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::AuditLog;
use crate::errors::DomainError;

/// Repository trait for AuditLog entity persistence operations
///
/// Audit rows are append-only: there is no update or delete.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Create a new audit log entry
    ///
    /// # Arguments
    /// * `audit_log` - The audit log entry to persist
    ///
    /// # Returns
    /// * `Ok(())` on successful creation
    /// * `Err(DomainError::TransientStorage)` if a retry may succeed
    /// * `Err(DomainError)` for any other failure
    async fn create(&self, audit_log: &AuditLog) -> Result<(), DomainError>;

    /// Find audit logs for an entity
    ///
    /// # Arguments
    /// * `entity_id` - The entity (worklog) ID to search for
    /// * `limit` - Maximum number of records to return
    ///
    /// # Returns
    /// * List of audit logs for the entity, ordered by created_at descending
    async fn find_by_entity(
        &self,
        entity_id: Uuid,
        limit: usize,
    ) -> Result<Vec<AuditLog>, DomainError>;

    /// Count audit logs recorded for an entity
    async fn count_by_entity(&self, entity_id: Uuid) -> Result<usize, DomainError>;
}
