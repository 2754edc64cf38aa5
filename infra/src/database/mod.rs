//! Database module - MySQL implementations using SQLx
//!
//! This module provides database access layer implementations including:
//! - Connection pool management
//! - Repository implementations for the core traits
//! - Mapping of driver errors onto the domain taxonomy
//! - Embedded schema migrations

pub mod connection;
pub mod errors;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlAuditLogRepository, MySqlUserRepository, MySqlWorklogRepository};
