//! Worklog repository trait: reads of worklogs and their inputs, and the
//! atomic settlement commit.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Adjustment, Remittance, TimeSegment, WorkLog, WorkLogStatus};
use crate::domain::value_objects::SettlementCommit;
use crate::errors::DomainError;

/// Repository trait for worklog persistence operations
///
/// Implementations map storage failures onto the domain taxonomy: timeouts,
/// deadlocks and pool exhaustion become `TransientStorage`, everything else
/// unexpected becomes `Internal`.
#[async_trait]
pub trait WorklogRepository: Send + Sync {
    /// Find a worklog by ID
    ///
    /// # Returns
    /// * `Ok(Some(WorkLog))` - Worklog found
    /// * `Ok(None)` - No worklog with this ID
    /// * `Err(DomainError)` - Storage error
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkLog>, DomainError>;

    /// All time segments of a worklog, including removed ones
    async fn find_segments(&self, worklog_id: Uuid) -> Result<Vec<TimeSegment>, DomainError>;

    /// All adjustments of a worklog
    async fn find_adjustments(&self, worklog_id: Uuid) -> Result<Vec<Adjustment>, DomainError>;

    /// Open worklogs owned by a user, oldest first
    async fn find_open_by_user(&self, user_id: Uuid) -> Result<Vec<WorkLog>, DomainError>;

    /// Worklogs in `status`, or every worklog when `None`, oldest first
    async fn find_by_status(&self, status: Option<WorkLogStatus>) -> Result<Vec<WorkLog>, DomainError>;

    /// The remittance produced for a worklog, if it has been settled
    async fn find_remittance(&self, worklog_id: Uuid) -> Result<Option<Remittance>, DomainError>;

    /// Settle a worklog in one transaction
    ///
    /// Locks the worklog row, verifies it is still open at
    /// `commit.expected_version`, then writes the status, amount, version
    /// bump, remittance and settled audit row. Nothing is written on error.
    ///
    /// Replaying a commit whose remittance was already stored returns that
    /// remittance unchanged.
    ///
    /// # Returns
    /// * `Ok(Remittance)` - The stored remittance
    /// * `Err(DomainError::NotFound)` - Worklog is absent
    /// * `Err(DomainError::AlreadySettled)` - Another settlement won
    /// * `Err(DomainError::ConcurrentModification)` - Version moved since it was read
    /// * `Err(DomainError::TransientStorage)` - Retriable storage failure
    async fn commit_settlement(&self, commit: &SettlementCommit) -> Result<Remittance, DomainError>;
}
