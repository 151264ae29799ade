mod stacks;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::util::BoxCloneService;

/// Error type used by the composed operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flaky(pub usize);

impl std::fmt::Display for Flaky {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "attempt {} failed", self.0)
    }
}

impl std::error::Error for Flaky {}

/// Operation that sleeps `work_ms`, then fails its first `failures` calls.
pub fn flaky(
    failures: usize,
    work_ms: u64,
    calls: Arc<AtomicUsize>,
) -> BoxCloneService<String, usize, Flaky> {
    BoxCloneService::new(tower::service_fn(move |req: String| {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            tokio::time::sleep(std::time::Duration::from_millis(work_ms)).await;
            if n <= failures {
                Err(Flaky(n))
            } else {
                Ok(req.len())
            }
        }
    }))
}
