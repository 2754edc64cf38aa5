//! Domain-specific error types and error handling.
//!
//! Every settlement failure is reported through [`DomainError`]; nothing in
//! the core substitutes a default amount for a failed computation.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;
use wr_shared::error_codes;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Referenced entity is absent
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Terminal-state violation: the worklog has already been settled
    #[error("Worklog {worklog_id} is already settled")]
    AlreadySettled { worklog_id: Uuid },

    /// A time segment carries negative hours or rate
    #[error("Invalid time segment {segment_id}: {reason}")]
    InvalidSegment { segment_id: Uuid, reason: String },

    /// The computed payable amount is negative or not representable
    #[error("Invalid settlement amount {amount}: {reason}")]
    InvalidAmount { amount: Decimal, reason: String },

    /// Another settlement changed the worklog row first
    #[error("Worklog {worklog_id} was modified concurrently")]
    ConcurrentModification { worklog_id: Uuid },

    /// An audit entry could not be stored; the attempt is aborted
    #[error("Audit log could not be persisted: {message}")]
    AuditPersistence { message: String },

    /// Retriable storage failure (timeout, deadlock, pool exhaustion)
    #[error("Transient storage failure: {message}")]
    TransientStorage { message: String },

    /// Malformed request, e.g. an empty batch
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Non-retriable infrastructure failure
    #[error("Internal error: {message}")]
    Internal { message: String },
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Not-found error for a worklog id
    pub fn worklog_not_found(worklog_id: Uuid) -> Self {
        Self::NotFound {
            resource: format!("worklog {}", worklog_id),
        }
    }

    /// Stable snake_case tag used in batch item errors and API error codes
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_codes::NOT_FOUND,
            Self::AlreadySettled { .. } => error_codes::ALREADY_SETTLED,
            Self::InvalidSegment { .. } => error_codes::INVALID_SEGMENT,
            Self::InvalidAmount { .. } => error_codes::INVALID_AMOUNT,
            Self::ConcurrentModification { .. } => error_codes::CONCURRENT_MODIFICATION,
            Self::AuditPersistence { .. } => error_codes::AUDIT_PERSISTENCE,
            Self::TransientStorage { .. } => error_codes::TRANSIENT_STORAGE,
            Self::Validation { .. } => error_codes::VALIDATION_ERROR,
            Self::Internal { .. } => error_codes::INTERNAL_ERROR,
        }
    }

    /// Whether a bounded retry may succeed
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::TransientStorage { .. })
    }

    /// Domain validation failures (bad segment or amount data)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidSegment { .. } | Self::InvalidAmount { .. } | Self::Validation { .. }
        )
    }

    /// State conflicts on the worklog row
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadySettled { .. } | Self::ConcurrentModification { .. }
        )
    }
}

#[cfg(test)]
mod tests;
