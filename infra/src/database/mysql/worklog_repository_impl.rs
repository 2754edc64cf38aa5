//! MySQL implementation of the WorklogRepository trait.
//!
//! Settlement runs in one transaction: the worklog row is locked with
//! `SELECT ... FOR UPDATE`, checked for status and version, then updated
//! together with the remittance and settled audit inserts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, Transaction};
use uuid::Uuid;

use wr_core::domain::entities::{
    Adjustment, Remittance, SegmentStatus, TimeSegment, WorkLog, WorkLogStatus,
};
use wr_core::domain::value_objects::SettlementCommit;
use wr_core::errors::DomainError;
use wr_core::repositories::WorklogRepository;

use super::audit_repository_impl::insert_audit_log;
use super::{column, uuid_column};
use crate::database::errors::{is_duplicate_key, is_transient, map_sqlx_error};

const SELECT_WORKLOG: &str = r#"
    SELECT id, user_id, status, amount, created_at, settled_at, version
    FROM worklogs
"#;

const SELECT_REMITTANCE: &str = r#"
    SELECT id, worklog_id, user_id, amount, created_at
    FROM remittances
    WHERE worklog_id = ?
"#;

/// MySQL implementation of WorklogRepository
pub struct MySqlWorklogRepository {
    pool: MySqlPool,
}

impl MySqlWorklogRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_worklog(row: &MySqlRow) -> Result<WorkLog, DomainError> {
        let status_str: String = column(row, "status")?;
        let status = WorkLogStatus::parse(&status_str).ok_or_else(|| DomainError::Internal {
            message: format!("Unknown worklog status: {}", status_str),
        })?;
        let amount: Option<Decimal> = column(row, "amount")?;
        let created_at: DateTime<Utc> = column(row, "created_at")?;
        let settled_at: Option<DateTime<Utc>> = column(row, "settled_at")?;

        Ok(WorkLog {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            status,
            amount,
            created_at,
            settled_at,
            version: column(row, "version")?,
        })
    }

    fn row_to_segment(row: &MySqlRow) -> Result<TimeSegment, DomainError> {
        let status_str: String = column(row, "status")?;
        let status = SegmentStatus::parse(&status_str).ok_or_else(|| DomainError::Internal {
            message: format!("Unknown segment status: {}", status_str),
        })?;

        Ok(TimeSegment {
            id: uuid_column(row, "id")?,
            worklog_id: uuid_column(row, "worklog_id")?,
            hours: column(row, "hours")?,
            rate: column(row, "rate")?,
            status,
            created_at: column(row, "created_at")?,
        })
    }

    fn row_to_adjustment(row: &MySqlRow) -> Result<Adjustment, DomainError> {
        Ok(Adjustment {
            id: uuid_column(row, "id")?,
            worklog_id: uuid_column(row, "worklog_id")?,
            amount: column(row, "amount")?,
            reason: column(row, "reason")?,
            created_at: column(row, "created_at")?,
        })
    }

    fn row_to_remittance(row: &MySqlRow) -> Result<Remittance, DomainError> {
        Ok(Remittance {
            id: uuid_column(row, "id")?,
            worklog_id: uuid_column(row, "worklog_id")?,
            user_id: uuid_column(row, "user_id")?,
            amount: column(row, "amount")?,
            created_at: column(row, "created_at")?,
        })
    }

    /// Steps of the settlement transaction; the caller commits on `Ok`
    async fn settle_in_transaction(
        tx: &mut Transaction<'_, MySql>,
        commit: &SettlementCommit,
    ) -> Result<Remittance, DomainError> {
        let worklog_id = commit.worklog_id.to_string();

        let locked = sqlx::query(&format!("{} WHERE id = ? FOR UPDATE", SELECT_WORKLOG))
            .bind(&worklog_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("lock worklog", e))?
            .ok_or_else(|| DomainError::worklog_not_found(commit.worklog_id))?;
        let worklog = Self::row_to_worklog(&locked)?;

        if worklog.is_settled() {
            let existing = sqlx::query(SELECT_REMITTANCE)
                .bind(&worklog_id)
                .fetch_optional(&mut **tx)
                .await
                .map_err(|e| map_sqlx_error("load remittance", e))?;

            return match existing.as_ref().map(Self::row_to_remittance).transpose()? {
                Some(remittance) if remittance.id == commit.remittance.id => Ok(remittance),
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

        let updated = sqlx::query(
            r#"
            UPDATE worklogs
            SET status = ?, amount = ?, settled_at = ?, version = version + 1
            WHERE id = ? AND version = ? AND status = ?
            "#,
        )
        .bind(WorkLogStatus::Settled.as_str())
        .bind(commit.amount)
        .bind(commit.settled_at)
        .bind(&worklog_id)
        .bind(commit.expected_version)
        .bind(WorkLogStatus::Open.as_str())
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("update worklog", e))?;

        if updated.rows_affected() != 1 {
            return Err(DomainError::ConcurrentModification {
                worklog_id: commit.worklog_id,
            });
        }

        let remittance = &commit.remittance;
        sqlx::query(
            r#"
            INSERT INTO remittances (id, worklog_id, user_id, amount, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(remittance.id.to_string())
        .bind(&worklog_id)
        .bind(remittance.user_id.to_string())
        .bind(remittance.amount)
        .bind(remittance.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if is_duplicate_key(&e) {
                DomainError::AlreadySettled {
                    worklog_id: commit.worklog_id,
                }
            } else {
                map_sqlx_error("insert remittance", e)
            }
        })?;

        insert_audit_log(&mut **tx, &commit.audit)
            .await
            .map_err(|e| {
                if is_transient(&e) {
                    map_sqlx_error("insert settlement audit log", e)
                } else {
                    tracing::error!("Failed to write settlement audit log: {}", e);
                    DomainError::AuditPersistence {
                        message: e.to_string(),
                    }
                }
            })?;

        Ok(remittance.clone())
    }
}

#[async_trait]
impl WorklogRepository for MySqlWorklogRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkLog>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_WORKLOG))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find worklog", e))?;

        row.as_ref().map(Self::row_to_worklog).transpose()
    }

    async fn find_segments(&self, worklog_id: Uuid) -> Result<Vec<TimeSegment>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, worklog_id, hours, rate, status, created_at
            FROM time_segments
            WHERE worklog_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(worklog_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find time segments", e))?;

        rows.iter().map(Self::row_to_segment).collect()
    }

    async fn find_adjustments(&self, worklog_id: Uuid) -> Result<Vec<Adjustment>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, worklog_id, amount, reason, created_at
            FROM adjustments
            WHERE worklog_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(worklog_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find adjustments", e))?;

        rows.iter().map(Self::row_to_adjustment).collect()
    }

    async fn find_open_by_user(&self, user_id: Uuid) -> Result<Vec<WorkLog>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} WHERE user_id = ? AND status = ? ORDER BY created_at ASC, id ASC",
            SELECT_WORKLOG
        ))
        .bind(user_id.to_string())
        .bind(WorkLogStatus::Open.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find open worklogs", e))?;

        rows.iter().map(Self::row_to_worklog).collect()
    }

    async fn find_by_status(&self, status: Option<WorkLogStatus>) -> Result<Vec<WorkLog>, DomainError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "{} WHERE status = ? ORDER BY created_at ASC, id ASC",
                    SELECT_WORKLOG
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!("{} ORDER BY created_at ASC, id ASC", SELECT_WORKLOG))
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| map_sqlx_error("list worklogs", e))?;

        rows.iter().map(Self::row_to_worklog).collect()
    }

    async fn find_remittance(&self, worklog_id: Uuid) -> Result<Option<Remittance>, DomainError> {
        let row = sqlx::query(SELECT_REMITTANCE)
            .bind(worklog_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find remittance", e))?;

        row.as_ref().map(Self::row_to_remittance).transpose()
    }

    async fn commit_settlement(&self, commit: &SettlementCommit) -> Result<Remittance, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin settlement transaction", e))?;

        match Self::settle_in_transaction(&mut tx, commit).await {
            Ok(remittance) => {
                tx.commit()
                    .await
                    .map_err(|e| map_sqlx_error("commit settlement", e))?;
                Ok(remittance)
            }
            Err(error) => {
                if let Err(e) = tx.rollback().await {
                    tracing::warn!(
                        worklog_id = %commit.worklog_id,
                        "Rollback after failed settlement also failed: {}",
                        e
                    );
                }
                Err(error)
            }
        }
    }
}
