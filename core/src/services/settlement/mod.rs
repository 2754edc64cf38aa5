//! Settlement of worklogs into remittances.
//!
//! - [`SegmentAggregator`] turns time segments into a base amount
//! - [`RemittanceCalculator`] applies adjustments and the finalization markup
//! - [`SettlementOrchestrator`] loads, computes and commits, one worklog or many

mod aggregator;
mod calculator;
mod cancellation;
mod orchestrator;

pub use aggregator::SegmentAggregator;
pub use calculator::{RemittanceCalculator, CURRENCY_SCALE, MARKUP_FACTOR};
pub use cancellation::{CancelOnDrop, CancellationFlag};
pub use orchestrator::SettlementOrchestrator;

#[cfg(test)]
mod tests;
