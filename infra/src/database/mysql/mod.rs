//! MySQL repository implementations
//!
//! Ids are stored as `CHAR(36)` strings, money as `DECIMAL`, timestamps as
//! `TIMESTAMP(6)` in UTC.

mod audit_repository_impl;
mod user_repository_impl;
mod worklog_repository_impl;

pub use audit_repository_impl::MySqlAuditLogRepository;
pub use user_repository_impl::MySqlUserRepository;
pub use worklog_repository_impl::MySqlWorklogRepository;

use sqlx::mysql::MySqlRow;
use sqlx::{Decode, MySql, Row, Type};
use uuid::Uuid;
use wr_core::errors::DomainError;

/// Read a column, reporting decode failures as `Internal`
pub(crate) fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get(name).map_err(|e| DomainError::Internal {
        message: format!("Failed to get {}: {}", name, e),
    })
}

/// Read a `CHAR(36)` column as a UUID
pub(crate) fn uuid_column(row: &MySqlRow, name: &str) -> Result<Uuid, DomainError> {
    let raw: String = column(row, name)?;
    Uuid::parse_str(&raw).map_err(|e| DomainError::Internal {
        message: format!("Invalid UUID in {}: {}", name, e),
    })
}
