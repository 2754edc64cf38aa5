//! Mapping of SQLx errors onto [`DomainError`].

use sqlx::mysql::MySqlDatabaseError;
use wr_core::errors::DomainError;

/// ER_DUP_ENTRY
const ER_DUP_ENTRY: u16 = 1062;
/// ER_LOCK_WAIT_TIMEOUT
const ER_LOCK_WAIT_TIMEOUT: u16 = 1205;
/// ER_LOCK_DEADLOCK
const ER_LOCK_DEADLOCK: u16 = 1213;

fn mysql_error_number(error: &sqlx::Error) -> Option<u16> {
    match error {
        sqlx::Error::Database(db) => db
            .try_downcast_ref::<MySqlDatabaseError>()
            .map(|e| e.number()),
        _ => None,
    }
}

/// Whether a retry of the same statement may succeed
pub fn is_transient(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => true,
        sqlx::Error::Database(_) => matches!(
            mysql_error_number(error),
            Some(ER_LOCK_WAIT_TIMEOUT) | Some(ER_LOCK_DEADLOCK)
        ),
        _ => false,
    }
}

/// Unique key violation
pub fn is_duplicate_key(error: &sqlx::Error) -> bool {
    mysql_error_number(error) == Some(ER_DUP_ENTRY)
}

/// Classify a driver error; `context` names the failed operation
pub fn map_sqlx_error(context: &str, error: sqlx::Error) -> DomainError {
    if is_transient(&error) {
        tracing::warn!("Transient database failure during {}: {}", context, error);
        DomainError::TransientStorage {
            message: format!("{}: {}", context, error),
        }
    } else {
        tracing::error!("Database failure during {}: {}", context, error);
        DomainError::Internal {
            message: format!("Failed to {}: {}", context, error),
        }
    }
}
