use std::sync::Arc;
use std::time::Duration;

/// Predicate deciding whether a failure is transient and should be retried.
pub type RetryPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Attempt budget, fixed delay and failure filter for one retry wrapper.
pub struct RetryPolicy<E> {
    pub(crate) max_attempts: usize,
    pub(crate) delay: Duration,
    pub(crate) retry_predicate: Option<RetryPredicate<E>>,
}

impl<E> RetryPolicy<E> {
    pub(crate) fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            retry_predicate: None,
        }
    }

    /// Returns true if the failure matches the filter.
    ///
    /// Without a filter every failure is considered transient.
    pub fn should_retry(&self, error: &E) -> bool {
        self.retry_predicate
            .as_ref()
            .map_or(true, |predicate| predicate(error))
    }

    /// Returns true if another attempt may follow the given (1-based) attempt.
    pub fn has_attempts_left(&self, attempt: usize) -> bool {
        attempt < self.max_attempts
    }

    /// The total number of attempts, including the first one.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// The fixed pause between attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}
