//! Settlement orchestrator: drives one worklog or a batch from OPEN to
//! SETTLED.
//!
//! Per worklog the sequence is read, aggregate, compute, commit. The commit
//! is a single store transaction carrying the status, amount, remittance and
//! settled audit row. Failures are rolled back by the store and then audited
//! as `failed`. Worklogs in a batch are independent: one failing never
//! affects another.

use std::sync::Arc;

use chrono::Utc;
use futures_util::future;
use futures_util::stream::{self, StreamExt};
use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use wr_shared::SettlementConfig;

use crate::domain::entities::{Adjustment, AuditLog, Remittance, WorkLog, WorkLogStatus};
use crate::domain::value_objects::{
    BatchResult, SettleOptions, SettlementCommit, SettlementPreview, SettlementResult,
    WorklogSummary,
};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{AuditLogRepository, UserRepository, WorklogRepository};
use crate::services::audit::AuditRecorder;
use crate::services::notification::NotificationNotifier;
use crate::services::retry::RetryPolicy;

use super::{CancellationFlag, RemittanceCalculator, SegmentAggregator};

/// Computed but uncommitted settlement of an open worklog
struct Computation {
    base: Decimal,
    adjustment: Decimal,
    amount: Decimal,
}

/// Settles worklogs into remittances
pub struct SettlementOrchestrator<W, A, U, N>
where
    W: WorklogRepository,
    A: AuditLogRepository,
    U: UserRepository,
    N: NotificationNotifier,
{
    worklogs: Arc<W>,
    users: Arc<U>,
    notifier: Arc<N>,
    audit: AuditRecorder<A>,
    aggregator: SegmentAggregator,
    calculator: RemittanceCalculator,
    retry: RetryPolicy,
    config: SettlementConfig,
}

impl<W, A, U, N> SettlementOrchestrator<W, A, U, N>
where
    W: WorklogRepository + 'static,
    A: AuditLogRepository + 'static,
    U: UserRepository + 'static,
    N: NotificationNotifier + 'static,
{
    /// Create a new orchestrator
    pub fn new(
        worklogs: Arc<W>,
        audit_logs: Arc<A>,
        users: Arc<U>,
        notifier: Arc<N>,
        config: SettlementConfig,
    ) -> Self {
        Self {
            worklogs,
            users,
            notifier,
            audit: AuditRecorder::new(audit_logs, RetryPolicy::audit(&config)),
            aggregator: SegmentAggregator::new(),
            calculator: RemittanceCalculator::new(),
            retry: RetryPolicy::settlement(&config),
            config,
        }
    }

    /// Options used when a request does not specify any
    pub fn default_options(&self) -> SettleOptions {
        SettleOptions::new(self.config.finalize_by_default)
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Settle a single worklog
    ///
    /// Every call leaves exactly one audit row: `settled` inside the commit or
    /// `failed` after it. When the `failed` row itself cannot be stored the
    /// call returns `AuditPersistence` instead of the settlement error.
    ///
    /// # Errors
    /// * `NotFound` - No such worklog
    /// * `AlreadySettled` - Worklog is already SETTLED
    /// * `InvalidSegment` / `InvalidAmount` - Bad input data
    /// * `ConcurrentModification` - Lost a race on the worklog row
    /// * `TransientStorage` - Storage kept failing after retries
    /// * `AuditPersistence` - An audit row could not be written
    #[instrument(skip(self), fields(finalize = options.finalize))]
    pub async fn settle_one(
        &self,
        worklog_id: Uuid,
        options: SettleOptions,
    ) -> DomainResult<SettlementResult> {
        match self.try_settle(worklog_id, options).await {
            Ok((result, user_id)) => {
                info!(
                    remittance_id = %result.remittance_id,
                    amount = %result.amount,
                    "Worklog settled"
                );
                self.notify_settled(user_id, &result).await;
                Ok(result)
            }
            Err(error) => {
                warn!(kind = error.kind(), "Settlement failed: {}", error);
                self.audit
                    .record_failure(worklog_id, &error, options.finalize)
                    .await?;
                Err(error)
            }
        }
    }

    /// Settle many worklogs, each in its own transaction
    ///
    /// Runs up to `max_concurrency` settlements at once. Per-item failures
    /// are collected into the result; the only batch-level error is an empty
    /// id list. A duplicated id is attempted again and reports
    /// `already_settled`. Once `cancel` is set no further item starts, and
    /// items that never started are left out of the result.
    #[instrument(skip(self, worklog_ids, cancel), fields(items = worklog_ids.len()))]
    pub async fn settle_batch(
        &self,
        worklog_ids: &[Uuid],
        options: SettleOptions,
        cancel: &CancellationFlag,
    ) -> DomainResult<BatchResult> {
        if worklog_ids.is_empty() {
            return Err(DomainError::Validation {
                message: "worklog_ids must not be empty".to_string(),
            });
        }

        let limit = self.config.max_concurrency.max(1);

        let outcomes: Vec<(Uuid, DomainResult<SettlementResult>)> =
            stream::iter(worklog_ids.iter().copied())
                .take_while(|_| future::ready(!cancel.is_cancelled()))
                .map(|worklog_id| async move {
                    (worklog_id, self.settle_one(worklog_id, options).await)
                })
                .buffered(limit)
                .collect()
                .await;

        let mut batch = BatchResult::default();
        for (worklog_id, outcome) in outcomes {
            batch.record(worklog_id, outcome);
        }

        if cancel.is_cancelled() {
            warn!(
                processed = batch.processed,
                requested = worklog_ids.len(),
                "Batch cancelled"
            );
        }

        info!(
            processed = batch.processed,
            succeeded = batch.succeeded,
            failed = batch.failed,
            "Batch settlement finished"
        );

        Ok(batch)
    }

    /// Settle every open worklog owned by an active user
    ///
    /// No open worklogs yields an empty result.
    #[instrument(skip(self, cancel))]
    pub async fn settle_all_open(
        &self,
        options: SettleOptions,
        cancel: &CancellationFlag,
    ) -> DomainResult<BatchResult> {
        let users = self
            .retry
            .run("load_active_users", || self.users.find_active())
            .await?;

        let mut worklog_ids = Vec::new();
        for user in &users {
            let open = self
                .retry
                .run("load_open_worklogs", || self.worklogs.find_open_by_user(user.id))
                .await?;
            worklog_ids.extend(open.iter().map(|w| w.id));
        }

        info!(
            users = users.len(),
            worklogs = worklog_ids.len(),
            "Collected open worklogs"
        );

        if worklog_ids.is_empty() {
            return Ok(BatchResult::default());
        }

        self.settle_batch(&worklog_ids, options, cancel).await
    }

    /// [`settle_one`](Self::settle_one) on its own task
    ///
    /// Dropping the returned future does not cut the attempt short: the
    /// commit or the `failed` audit row is still written.
    pub async fn settle_one_detached(
        self: &Arc<Self>,
        worklog_id: Uuid,
        options: SettleOptions,
    ) -> DomainResult<SettlementResult> {
        let this = Arc::clone(self);
        join_detached(tokio::spawn(async move {
            this.settle_one(worklog_id, options).await
        }))
        .await
    }

    /// [`settle_batch`](Self::settle_batch) on its own task
    ///
    /// Dropping the returned future sets `cancel`. Items already started
    /// finish with their audit rows; no further item starts.
    pub async fn settle_batch_detached(
        self: &Arc<Self>,
        worklog_ids: Vec<Uuid>,
        options: SettleOptions,
        cancel: CancellationFlag,
    ) -> DomainResult<BatchResult> {
        let guard = cancel.cancel_on_drop();
        let this = Arc::clone(self);
        let outcome = join_detached(tokio::spawn(async move {
            this.settle_batch(&worklog_ids, options, &cancel).await
        }))
        .await;
        guard.disarm();
        outcome
    }

    /// [`settle_all_open`](Self::settle_all_open) on its own task, cancelled
    /// the same way as [`settle_batch_detached`](Self::settle_batch_detached)
    pub async fn settle_all_open_detached(
        self: &Arc<Self>,
        options: SettleOptions,
        cancel: CancellationFlag,
    ) -> DomainResult<BatchResult> {
        let guard = cancel.cancel_on_drop();
        let this = Arc::clone(self);
        let outcome = join_detached(tokio::spawn(async move {
            this.settle_all_open(options, &cancel).await
        }))
        .await;
        guard.disarm();
        outcome
    }

    /// Every worklog, optionally filtered by status, oldest first
    ///
    /// Settled rows report their committed amount. Open rows report what they
    /// would settle for with `finalize`; an open worklog whose segments or
    /// amount are invalid is listed without an amount and with its error tag.
    /// Storage failures fail the whole listing.
    #[instrument(skip(self))]
    pub async fn list_worklogs(
        &self,
        status: Option<WorkLogStatus>,
        finalize: bool,
    ) -> DomainResult<Vec<WorklogSummary>> {
        let worklogs = self
            .retry
            .run("list_worklogs", || self.worklogs.find_by_status(status))
            .await?;

        let mut summaries = Vec::with_capacity(worklogs.len());
        for worklog in &worklogs {
            let summary = if worklog.is_settled() {
                WorklogSummary::new(worklog, Ok(self.settled_amount(worklog).await?))
            } else {
                match self.compute(worklog, finalize).await {
                    Ok(computed) => WorklogSummary::new(worklog, Ok(computed.amount)),
                    Err(error) if error.is_validation() => {
                        warn!(
                            worklog_id = %worklog.id,
                            kind = error.kind(),
                            "Listing open worklog without amount"
                        );
                        WorklogSummary::new(worklog, Err(&error))
                    }
                    Err(error) => return Err(error),
                }
            };
            summaries.push(summary);
        }

        Ok(summaries)
    }

    /// What a worklog would settle for, without writing anything
    ///
    /// For a settled worklog this is the committed amount.
    pub async fn preview(&self, worklog_id: Uuid, finalize: bool) -> DomainResult<SettlementPreview> {
        let worklog = self.load_worklog(worklog_id).await?;

        if worklog.is_settled() {
            let amount = self.settled_amount(&worklog).await?;

            return Ok(SettlementPreview {
                worklog_id,
                status: worklog.status,
                base_amount: None,
                adjustment_amount: None,
                amount,
                finalize,
            });
        }

        let computed = self.compute(&worklog, finalize).await?;
        Ok(SettlementPreview {
            worklog_id,
            status: worklog.status,
            base_amount: Some(computed.base),
            adjustment_amount: Some(computed.adjustment),
            amount: computed.amount,
            finalize,
        })
    }

    /// Audit history of a worklog, newest first
    pub async fn audit_trail(&self, worklog_id: Uuid, limit: usize) -> DomainResult<Vec<AuditLog>> {
        self.audit.trail(worklog_id, limit).await
    }

    async fn try_settle(
        &self,
        worklog_id: Uuid,
        options: SettleOptions,
    ) -> DomainResult<(SettlementResult, Uuid)> {
        let worklog = self.load_worklog(worklog_id).await?;
        if worklog.is_settled() {
            return Err(DomainError::AlreadySettled { worklog_id });
        }

        let computed = self.compute(&worklog, options.finalize).await?;

        let settled_at = Utc::now();
        let remittance = Remittance::new(worklog.id, worklog.user_id, computed.amount, settled_at);
        let audit = AuditRecorder::<A>::settled_entry(
            worklog.id,
            &remittance,
            computed.base,
            computed.adjustment,
            options.finalize,
        );
        let commit = SettlementCommit {
            worklog_id: worklog.id,
            expected_version: worklog.version,
            amount: computed.amount,
            settled_at,
            remittance,
            audit,
        };

        // A retried commit carries the same remittance id, so a commit that
        // landed before its acknowledgement was lost replays as success.
        let stored = self
            .retry
            .run("commit_settlement", || self.worklogs.commit_settlement(&commit))
            .await?;

        Ok((SettlementResult::from_remittance(&stored), worklog.user_id))
    }

    async fn load_worklog(&self, worklog_id: Uuid) -> DomainResult<WorkLog> {
        self.retry
            .run("load_worklog", || self.worklogs.find_by_id(worklog_id))
            .await?
            .ok_or_else(|| DomainError::worklog_not_found(worklog_id))
    }

    /// Committed amount of a settled worklog, read from the remittance when
    /// the worklog row carries none
    async fn settled_amount(&self, worklog: &WorkLog) -> DomainResult<Decimal> {
        if let Some(amount) = worklog.amount {
            return Ok(amount);
        }
        self.retry
            .run("load_remittance", || self.worklogs.find_remittance(worklog.id))
            .await?
            .map(|r| r.amount)
            .ok_or_else(|| DomainError::Internal {
                message: format!("settled worklog {} has no amount", worklog.id),
            })
    }

    async fn compute(&self, worklog: &WorkLog, finalize: bool) -> DomainResult<Computation> {
        let segments = self
            .retry
            .run("load_segments", || self.worklogs.find_segments(worklog.id))
            .await?;
        let adjustments = self
            .retry
            .run("load_adjustments", || self.worklogs.find_adjustments(worklog.id))
            .await?;

        let base = self.aggregator.aggregate(&segments)?;
        let adjustment = Adjustment::total(&adjustments).ok_or_else(|| DomainError::InvalidAmount {
            amount: Decimal::MAX,
            reason: "adjustment total overflows".to_string(),
        })?;
        let amount = self.calculator.calculate(base, adjustment, finalize)?;

        Ok(Computation {
            base,
            adjustment,
            amount,
        })
    }

    async fn notify_settled(&self, user_id: Uuid, result: &SettlementResult) {
        let message = format!(
            "Worklog {} settled: remittance {} for {}",
            result.worklog_id, result.remittance_id, result.amount
        );

        if self.config.notify_async {
            let notifier = Arc::clone(&self.notifier);
            tokio::spawn(async move {
                deliver(notifier.as_ref(), user_id, &message).await;
            });
        } else {
            deliver(self.notifier.as_ref(), user_id, &message).await;
        }
    }
}

async fn join_detached<T>(handle: JoinHandle<DomainResult<T>>) -> DomainResult<T> {
    handle.await.map_err(|e| DomainError::Internal {
        message: format!("settlement task failed: {}", e),
    })?
}

async fn deliver<N: NotificationNotifier + ?Sized>(notifier: &N, user_id: Uuid, message: &str) {
    if let Err(e) = notifier.notify(user_id, message).await {
        warn!(user_id = %user_id, "Failed to deliver settlement notification: {}", e);
    }
}
