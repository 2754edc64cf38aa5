//! Value objects representing immutable domain concepts.

pub mod settlement;

// Re-export commonly used types
pub use settlement::{
    BatchItemError, BatchResult, SettleOptions, SettlementCommit, SettlementPreview,
    SettlementResult, WorklogSummary,
};
