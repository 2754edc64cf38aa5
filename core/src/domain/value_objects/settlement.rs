//! Settlement inputs and outcomes exchanged between the orchestrator, the
//! storage adapters and the HTTP layer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{AuditLog, Remittance, WorkLog, WorkLogStatus};
use crate::errors::DomainError;

/// Per-request settlement options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleOptions {
    /// Apply the finalization markup
    pub finalize: bool,
}

impl SettleOptions {
    pub fn new(finalize: bool) -> Self {
        Self { finalize }
    }
}

/// Successful settlement of one worklog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub worklog_id: Uuid,
    pub remittance_id: Uuid,
    pub amount: Decimal,
    pub status: WorkLogStatus,
}

impl SettlementResult {
    pub fn from_remittance(remittance: &Remittance) -> Self {
        Self {
            worklog_id: remittance.worklog_id,
            remittance_id: remittance.id,
            amount: remittance.amount,
            status: WorkLogStatus::Settled,
        }
    }
}

/// Failure of one item inside a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItemError {
    pub worklog_id: Uuid,
    /// Stable error tag, see [`DomainError::kind`]
    pub kind: String,
    pub message: String,
}

impl BatchItemError {
    pub fn from_error(worklog_id: Uuid, error: &DomainError) -> Self {
        Self {
            worklog_id,
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// Aggregate outcome of a batch run
///
/// `processed == succeeded + failed`; items skipped by cancellation are not
/// counted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<BatchItemError>,
    pub settled: Vec<SettlementResult>,
}

impl BatchResult {
    /// Record the outcome of one item
    pub fn record(&mut self, worklog_id: Uuid, outcome: Result<SettlementResult, DomainError>) {
        self.processed += 1;
        match outcome {
            Ok(result) => {
                self.succeeded += 1;
                self.settled.push(result);
            }
            Err(error) => {
                self.failed += 1;
                self.errors.push(BatchItemError::from_error(worklog_id, &error));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.processed == 0
    }
}

/// Amount a worklog would settle for, computed without committing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementPreview {
    pub worklog_id: Uuid,
    pub status: WorkLogStatus,
    /// Aggregated segment value; absent for settled worklogs
    pub base_amount: Option<Decimal>,
    /// Net adjustment; absent for settled worklogs
    pub adjustment_amount: Option<Decimal>,
    pub amount: Decimal,
    pub finalize: bool,
}

/// One row of a worklog listing
///
/// Settled worklogs carry their committed amount. Open ones carry the
/// amount they would settle for now, or the error tag when their inputs
/// cannot be settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorklogSummary {
    pub worklog_id: Uuid,
    pub user_id: Uuid,
    pub status: WorkLogStatus,
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WorklogSummary {
    pub fn new(worklog: &WorkLog, amount: Result<Decimal, &DomainError>) -> Self {
        let (amount, amount_error) = match amount {
            Ok(amount) => (Some(amount), None),
            Err(error) => (None, Some(error.kind().to_string())),
        };
        Self {
            worklog_id: worklog.id,
            user_id: worklog.user_id,
            status: worklog.status,
            amount,
            amount_error,
            created_at: worklog.created_at,
        }
    }
}

/// Everything the store writes in the single settlement transaction
///
/// The store locks the worklog row, checks it is still open at
/// `expected_version`, then writes status, amount, the remittance and the
/// audit entry together or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementCommit {
    pub worklog_id: Uuid,
    pub expected_version: i64,
    pub amount: Decimal,
    pub settled_at: DateTime<Utc>,
    pub remittance: Remittance,
    pub audit: AuditLog,
}
