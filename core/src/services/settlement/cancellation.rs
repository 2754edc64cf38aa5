use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation for batch runs.
///
/// Checked before each item starts; items already committed stay committed.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl CancellationFlag {
    /// Guard that sets the flag when dropped, unless disarmed first
    pub fn cancel_on_drop(&self) -> CancelOnDrop {
        CancelOnDrop {
            flag: self.clone(),
            armed: true,
        }
    }
}

/// Sets its [`CancellationFlag`] on drop
///
/// Held by a caller awaiting a detached batch so that abandoning the await
/// stops the batch from starting new items.
#[must_use = "the flag is set as soon as the guard is dropped"]
#[derive(Debug)]
pub struct CancelOnDrop {
    flag: CancellationFlag,
    armed: bool,
}

impl CancelOnDrop {
    /// Drop without setting the flag
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.flag.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_cancels_on_drop() {
        let flag = CancellationFlag::new();
        drop(flag.cancel_on_drop());
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_disarmed_guard_leaves_flag_alone() {
        let flag = CancellationFlag::new();
        flag.cancel_on_drop().disarm();
        assert!(!flag.is_cancelled());
    }
}
