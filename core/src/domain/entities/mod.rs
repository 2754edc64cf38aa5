//! Domain entities representing core business objects.
//!
//! Each entity keeps its own table and invariants; relationships are plain
//! foreign-key ids (`worklog_id`, `user_id`).

pub mod adjustment;
pub mod audit;
pub mod remittance;
pub mod time_segment;
pub mod user;
pub mod worklog;

// Re-export commonly used types
pub use adjustment::Adjustment;
pub use audit::{AuditAction, AuditLog};
pub use remittance::Remittance;
pub use time_segment::{SegmentStatus, TimeSegment};
pub use user::{User, UserStatus};
pub use worklog::{WorkLog, WorkLogStatus};
