//! MySQL implementation of the AuditLogRepository trait.
//!
//! Rows live in `settlement_audit_log` and are never updated or deleted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::mysql::MySqlRow;
use sqlx::{Executor, MySql, MySqlPool};
use uuid::Uuid;

use wr_core::domain::entities::{AuditAction, AuditLog};
use wr_core::errors::DomainError;
use wr_core::repositories::AuditLogRepository;

use super::{column, uuid_column};
use crate::database::errors::map_sqlx_error;

const INSERT_AUDIT_LOG: &str = r#"
    INSERT INTO settlement_audit_log (id, entity_id, action, detail, created_at)
    VALUES (?, ?, ?, ?, ?)
"#;

/// Insert one audit row on any executor, a pool or an open transaction
pub(crate) async fn insert_audit_log<'e, E>(executor: E, audit_log: &AuditLog) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = MySql>,
{
    sqlx::query(INSERT_AUDIT_LOG)
        .bind(audit_log.id.to_string())
        .bind(audit_log.entity_id.to_string())
        .bind(audit_log.action.as_str())
        .bind(audit_log.detail.to_string())
        .bind(audit_log.created_at)
        .execute(executor)
        .await?;
    Ok(())
}

/// MySQL implementation of AuditLogRepository
pub struct MySqlAuditLogRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAuditLogRepository {
    /// Create a new MySQL audit log repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to AuditLog entity
    fn row_to_audit_log(row: &MySqlRow) -> Result<AuditLog, DomainError> {
        let action_str: String = column(row, "action")?;
        let action = AuditAction::parse(&action_str).ok_or_else(|| DomainError::Internal {
            message: format!("Unknown audit action: {}", action_str),
        })?;
        let detail: JsonValue = column(row, "detail")?;
        let created_at: DateTime<Utc> = column(row, "created_at")?;

        Ok(AuditLog {
            id: uuid_column(row, "id")?,
            entity_id: uuid_column(row, "entity_id")?,
            action,
            detail,
            created_at,
        })
    }
}

#[async_trait]
impl AuditLogRepository for MySqlAuditLogRepository {
    async fn create(&self, audit_log: &AuditLog) -> Result<(), DomainError> {
        insert_audit_log(&self.pool, audit_log)
            .await
            .map_err(|e| map_sqlx_error("create audit log", e))
    }

    async fn find_by_entity(
        &self,
        entity_id: Uuid,
        limit: usize,
    ) -> Result<Vec<AuditLog>, DomainError> {
        let query = r#"
            SELECT id, entity_id, action, detail, created_at
            FROM settlement_audit_log
            WHERE entity_id = ?
            ORDER BY created_at DESC, seq DESC
            LIMIT ?
        "#;

        let rows = sqlx::query(query)
            .bind(entity_id.to_string())
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find audit logs by entity", e))?;

        rows.iter()
            .map(Self::row_to_audit_log)
            .collect::<Result<Vec<_>, _>>()
    }

    async fn count_by_entity(&self, entity_id: Uuid) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM settlement_audit_log WHERE entity_id = ?",
        )
        .bind(entity_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("count audit logs", e))?;

        Ok(count as usize)
    }
}
