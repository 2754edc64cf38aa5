//! Worklog repository module.

mod r#trait;
pub use r#trait::WorklogRepository;

mod mock;
pub use mock::MockWorklogRepository;
