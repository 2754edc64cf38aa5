//! Shared utilities and common types for the WorkRemit server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and loading
//! - Error response structures and error codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, DatabaseConfig, Environment, LoggingConfig, ServerConfig,
    SettlementConfig,
};
pub use errors::{error_codes, ErrorResponse};
