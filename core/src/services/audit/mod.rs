//! Audit recording for settlement attempts.

mod recorder;

pub use recorder::AuditRecorder;

#[cfg(test)]
mod tests;
