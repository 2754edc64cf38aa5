//! Notification adapters
//!
//! Delivery transports are external; these adapters cover development,
//! tests and deployments without a notification channel.

mod logging_notifier;
mod noop;

pub use logging_notifier::LoggingNotifier;
pub use noop::NoOpNotifier;
