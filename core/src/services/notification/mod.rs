//! Notification boundary for settlement outcomes.
//!
//! Delivery (email, SMS, push) lives outside the core; adapters implement
//! [`NotificationNotifier`].

mod traits;

pub use traits::{NotificationError, NotificationNotifier};
