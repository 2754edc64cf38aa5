pub mod audit;
pub mod user;
pub mod worklog;

pub use audit::{AuditLogRepository, MockAuditLogRepository};
pub use user::{MockUserRepository, UserRepository};
pub use worklog::{MockWorklogRepository, WorklogRepository};
