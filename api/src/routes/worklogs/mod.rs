//! Worklog settlement route handlers
//!
//! - Listing worklogs with their amounts
//! - Settling one worklog, a batch, or every open worklog
//! - Previewing a settlement amount
//! - Reading the settlement audit trail

pub mod audit_log;
pub mod list;
pub mod preview;
pub mod settle;
pub mod settle_all;
pub mod settle_batch;

use std::sync::Arc;

use wr_core::repositories::{AuditLogRepository, UserRepository, WorklogRepository};
use wr_core::services::{NotificationNotifier, SettlementOrchestrator};

/// Application state that holds shared services
pub struct AppState<W, A, U, N>
where
    W: WorklogRepository,
    A: AuditLogRepository,
    U: UserRepository,
    N: NotificationNotifier,
{
    pub orchestrator: Arc<SettlementOrchestrator<W, A, U, N>>,
}

impl<W, A, U, N> AppState<W, A, U, N>
where
    W: WorklogRepository,
    A: AuditLogRepository,
    U: UserRepository,
    N: NotificationNotifier,
{
    pub fn new(orchestrator: Arc<SettlementOrchestrator<W, A, U, N>>) -> Self {
        Self { orchestrator }
    }
}
