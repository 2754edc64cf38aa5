//! Audit recorder: builds and persists the audit row for every settlement
//! attempt.
//!
//! Successful settlements hand their `settled` entry to the worklog store so
//! it is written in the settlement transaction. Failed attempts are appended
//! here after the rollback.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};
use tracing::error;
use uuid::Uuid;

use crate::domain::entities::{AuditAction, AuditLog, Remittance};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::AuditLogRepository;
use crate::services::retry::RetryPolicy;

/// Appends immutable audit entries with bounded retries
pub struct AuditRecorder<R>
where
    R: AuditLogRepository,
{
    repository: Arc<R>,
    retry: RetryPolicy,
}

impl<R> AuditRecorder<R>
where
    R: AuditLogRepository,
{
    /// Create a new audit recorder
    pub fn new(repository: Arc<R>, retry: RetryPolicy) -> Self {
        Self { repository, retry }
    }

    /// Entry for a successful settlement, committed with the worklog update
    pub fn settled_entry(
        worklog_id: Uuid,
        remittance: &Remittance,
        base_amount: Decimal,
        adjustment_amount: Decimal,
        finalize: bool,
    ) -> AuditLog {
        AuditLog::new(worklog_id, AuditAction::Settled).with_detail(json!({
            "remittance_id": remittance.id,
            "user_id": remittance.user_id,
            "amount": remittance.amount,
            "base_amount": base_amount,
            "adjustment_amount": adjustment_amount,
            "finalize": finalize,
        }))
    }

    /// Entry for a failed settlement attempt
    pub fn failed_entry(worklog_id: Uuid, failure: &DomainError, finalize: bool) -> AuditLog {
        AuditLog::new(worklog_id, AuditAction::Failed).with_detail(json!({
            "kind": failure.kind(),
            "message": failure.to_string(),
            "finalize": finalize,
        }))
    }

    /// Persist one audit row
    ///
    /// Transient storage errors are retried; anything left over is reported
    /// as `AuditPersistence`.
    pub async fn append(
        &self,
        entity_id: Uuid,
        action: AuditAction,
        detail: JsonValue,
    ) -> DomainResult<AuditLog> {
        self.append_entry(AuditLog::new(entity_id, action).with_detail(detail))
            .await
    }

    /// Persist a prepared entry, see [`AuditRecorder::append`]
    pub async fn append_entry(&self, entry: AuditLog) -> DomainResult<AuditLog> {
        let repository = &self.repository;
        let entry_ref = &entry;

        match self
            .retry
            .run("audit_append", move || repository.create(entry_ref))
            .await
        {
            Ok(()) => Ok(entry),
            Err(e) => {
                error!(
                    entity_id = %entry.entity_id,
                    action = %entry.action,
                    "Failed to persist audit log: {}",
                    e
                );
                Err(DomainError::AuditPersistence {
                    message: e.to_string(),
                })
            }
        }
    }

    /// Append the `failed` row for an attempt that was rolled back
    ///
    /// If the row cannot be stored the returned `AuditPersistence` carries
    /// both the settlement failure and the audit failure.
    pub async fn record_failure(
        &self,
        worklog_id: Uuid,
        failure: &DomainError,
        finalize: bool,
    ) -> DomainResult<AuditLog> {
        self.append_entry(Self::failed_entry(worklog_id, failure, finalize))
            .await
            .map_err(|audit_error| DomainError::AuditPersistence {
                message: format!(
                    "{} (while recording settlement failure: {})",
                    audit_error, failure
                ),
            })
    }

    /// Audit history of an entity, newest first
    pub async fn trail(&self, entity_id: Uuid, limit: usize) -> DomainResult<Vec<AuditLog>> {
        self.repository.find_by_entity(entity_id, limit).await
    }
}
