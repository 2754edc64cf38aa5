//! # WorkRemit Core
//!
//! Core business logic and domain layer for the WorkRemit backend.
//! This crate contains domain entities, the settlement services, repository
//! interfaces, and error types that form the foundation of the application.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::{DomainError, DomainResult};
pub use repositories::{
    AuditLogRepository, MockAuditLogRepository, MockUserRepository, MockWorklogRepository,
    UserRepository, WorklogRepository,
};
pub use services::{
    AuditRecorder, CancellationFlag, NotificationError, NotificationNotifier,
    RemittanceCalculator, RetryPolicy, SegmentAggregator, SettlementOrchestrator,
    CURRENCY_SCALE, MARKUP_FACTOR,
};
