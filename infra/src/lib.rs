//! # Infrastructure Layer
//!
//! Concrete implementations of the core repository and notifier traits.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL pool and repositories using SQLx
//! - **Notification**: Notifier adapters (tracing-backed and no-op)
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Notification module - Notifier adapters
pub mod notification;

#[cfg(feature = "mysql")]
pub use database::{
    DatabasePool, MySqlAuditLogRepository, MySqlUserRepository, MySqlWorklogRepository,
    PoolStatistics,
};
pub use notification::{LoggingNotifier, NoOpNotifier};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
