//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use wr_core::domain::entities::{User, UserStatus};
use wr_core::errors::DomainError;
use wr_core::repositories::UserRepository;

use super::{column, uuid_column};
use crate::database::errors::map_sqlx_error;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        let status_str: String = column(row, "status")?;
        let status = UserStatus::parse(&status_str).ok_or_else(|| DomainError::Internal {
            message: format!("Unknown user status: {}", status_str),
        })?;
        let created_at: DateTime<Utc> = column(row, "created_at")?;
        let updated_at: DateTime<Utc> = column(row, "updated_at")?;

        Ok(User {
            id: uuid_column(row, "id")?,
            contact: column(row, "contact")?,
            status,
            created_at,
            updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            "SELECT id, contact, status, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find user", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_active(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, contact, status, created_at, updated_at
            FROM users
            WHERE status = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(UserStatus::Active.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find active users", e))?;

        rows.iter().map(Self::row_to_user).collect()
    }
}
