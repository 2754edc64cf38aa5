//! Business services containing domain logic and use cases.

pub mod audit;
pub mod notification;
pub mod retry;
pub mod settlement;

// Re-export commonly used types
pub use audit::AuditRecorder;
pub use notification::{NotificationError, NotificationNotifier};
pub use retry::RetryPolicy;
pub use settlement::{
    CancelOnDrop, CancellationFlag, RemittanceCalculator, SegmentAggregator,
    SettlementOrchestrator, CURRENCY_SCALE, MARKUP_FACTOR,
};
