use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handle to the invocation count of one wrapped operation.
///
/// Cloning the handle does not copy the count: every clone reads the same
/// counter, which keeps counting for as long as the wrapped service (or any
/// clone of it) is alive. The count is never reset.
#[derive(Debug, Clone, Default)]
pub struct CallCount {
    count: Arc<AtomicU64>,
}

impl CallCount {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of invocations started so far.
    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    /// Records one invocation and returns the new count.
    pub(crate) fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::AcqRel) + 1
    }
}
