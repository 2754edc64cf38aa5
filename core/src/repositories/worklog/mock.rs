//! Mock implementation of WorklogRepository for testing.
//!
//! A single mutex guards the whole store, which stands in for the row lock
//! the MySQL implementation takes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::domain::entities::{Adjustment, Remittance, TimeSegment, WorkLog, WorkLogStatus};
use crate::domain::value_objects::SettlementCommit;
use crate::errors::DomainError;
use crate::repositories::audit::MockAuditLogRepository;

use super::WorklogRepository;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
struct Store {
    worklogs: HashMap<Uuid, WorkLog>,
    segments: HashMap<Uuid, Vec<TimeSegment>>,
    adjustments: HashMap<Uuid, Vec<Adjustment>>,
    remittances: HashMap<Uuid, Remittance>,
}

/// Mock worklog repository for testing
pub struct MockWorklogRepository {
    store: Arc<Mutex<Store>>,
    audit: Arc<MockAuditLogRepository>,
    should_fail: Arc<Mutex<bool>>,
    transient_commit_failures: Arc<Mutex<u32>>,
    commit_attempts: Arc<Mutex<u32>>,
}

impl MockWorklogRepository {
    /// Create a new mock repository writing settled audit rows into `audit`
    pub fn new(audit: Arc<MockAuditLogRepository>) -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::default())),
            audit,
            should_fail: Arc::new(Mutex::new(false)),
            transient_commit_failures: Arc::new(Mutex::new(0)),
            commit_attempts: Arc::new(Mutex::new(0)),
        }
    }

    /// Set whether operations should fail with a non-retriable error
    pub fn set_should_fail(&self, should_fail: bool) {
        *lock(&self.should_fail) = should_fail;
    }

    /// Fail the next `count` commits with `TransientStorage`
    pub fn fail_next_commits(&self, count: u32) {
        *lock(&self.transient_commit_failures) = count;
    }

    /// Number of commit attempts seen, including failed ones
    pub fn commit_attempts(&self) -> u32 {
        *lock(&self.commit_attempts)
    }

    pub fn insert_worklog(&self, worklog: WorkLog) {
        lock(&self.store).worklogs.insert(worklog.id, worklog);
    }

    pub fn insert_segment(&self, segment: TimeSegment) {
        lock(&self.store)
            .segments
            .entry(segment.worklog_id)
            .or_default()
            .push(segment);
    }

    pub fn insert_adjustment(&self, adjustment: Adjustment) {
        lock(&self.store)
            .adjustments
            .entry(adjustment.worklog_id)
            .or_default()
            .push(adjustment);
    }

    /// Current state of a worklog
    pub fn get_worklog(&self, id: Uuid) -> Option<WorkLog> {
        lock(&self.store).worklogs.get(&id).cloned()
    }

    /// All stored remittances
    pub fn get_all_remittances(&self) -> Vec<Remittance> {
        lock(&self.store).remittances.values().cloned().collect()
    }

    fn check_fail(&self) -> Result<(), DomainError> {
        if *lock(&self.should_fail) {
            return Err(DomainError::Internal {
                message: "Mock repository error".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl WorklogRepository for MockWorklogRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkLog>, DomainError> {
        self.check_fail()?;
        Ok(lock(&self.store).worklogs.get(&id).cloned())
    }

    async fn find_segments(&self, worklog_id: Uuid) -> Result<Vec<TimeSegment>, DomainError> {
        self.check_fail()?;
        Ok(lock(&self.store)
            .segments
            .get(&worklog_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_adjustments(&self, worklog_id: Uuid) -> Result<Vec<Adjustment>, DomainError> {
        self.check_fail()?;
        Ok(lock(&self.store)
            .adjustments
            .get(&worklog_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_open_by_user(&self, user_id: Uuid) -> Result<Vec<WorkLog>, DomainError> {
        self.check_fail()?;
        let store = lock(&self.store);
        let mut open: Vec<WorkLog> = store
            .worklogs
            .values()
            .filter(|w| w.user_id == user_id && w.is_open())
            .cloned()
            .collect();
        open.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(open)
    }

    async fn find_by_status(&self, status: Option<WorkLogStatus>) -> Result<Vec<WorkLog>, DomainError> {
        self.check_fail()?;
        let store = lock(&self.store);
        let mut worklogs: Vec<WorkLog> = store
            .worklogs
            .values()
            .filter(|w| status.map_or(true, |s| w.status == s))
            .cloned()
            .collect();
        worklogs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(worklogs)
    }

    async fn find_remittance(&self, worklog_id: Uuid) -> Result<Option<Remittance>, DomainError> {
        self.check_fail()?;
        Ok(lock(&self.store).remittances.get(&worklog_id).cloned())
    }

    async fn commit_settlement(&self, commit: &SettlementCommit) -> Result<Remittance, DomainError> {
        *lock(&self.commit_attempts) += 1;
        self.check_fail()?;

        {
            let mut remaining = lock(&self.transient_commit_failures);
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DomainError::TransientStorage {
                    message: "Mock deadlock detected".to_string(),
                });
            }
        }

        let mut store = lock(&self.store);

        let worklog = store
            .worklogs
            .get(&commit.worklog_id)
            .cloned()
            .ok_or_else(|| DomainError::worklog_not_found(commit.worklog_id))?;

        if worklog.is_settled() {
            return match store.remittances.get(&commit.worklog_id) {
                Some(existing) if existing.id == commit.remittance.id => Ok(existing.clone()),
                _ => Err(DomainError::AlreadySettled {
                    worklog_id: commit.worklog_id,
                }),
            };
        }

        if worklog.version != commit.expected_version {
            return Err(DomainError::ConcurrentModification {
                worklog_id: commit.worklog_id,
            });
        }

        if store.remittances.contains_key(&commit.worklog_id) {
            return Err(DomainError::AlreadySettled {
                worklog_id: commit.worklog_id,
            });
        }

        // Audit first: if it fails nothing else has been touched.
        self.audit.append(&commit.audit).map_err(|e| {
            if e.is_retriable() {
                e
            } else {
                DomainError::AuditPersistence {
                    message: e.to_string(),
                }
            }
        })?;

        let mut settled = worklog;
        settled.settle(commit.amount, commit.settled_at);
        store.worklogs.insert(settled.id, settled);
        store
            .remittances
            .insert(commit.worklog_id, commit.remittance.clone());

        Ok(commit.remittance.clone())
    }
}
