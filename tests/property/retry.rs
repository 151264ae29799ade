//! Property tests for the retry wrapper.
//!
//! Invariants tested:
//! - k filtered failures followed by success within the budget take exactly k+1 calls
//! - An exhausted budget makes exactly max_attempts calls and returns the last failure
//! - Unfiltered failures are never retried

use super::paused_runtime;
use proptest::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tower::{Layer, Service, ServiceExt};
use tower_decorate_retry::RetryLayer;

#[derive(Debug, Clone, PartialEq)]
enum TestError {
    Retryable(usize),
    Fatal(usize),
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::Retryable(n) => write!(f, "retryable error on call {}", n),
            TestError::Fatal(n) => write!(f, "fatal error on call {}", n),
        }
    }
}

impl std::error::Error for TestError {}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property: invocation count is min(failures + 1, max_attempts)
    #[test]
    fn attempts_match_failure_sequence(
        max_attempts in 1usize..=10,
        failures in 0usize..=12,
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            let calls = Arc::new(AtomicUsize::new(0));
            let c = Arc::clone(&calls);
            let svc = tower::service_fn(move |_req: ()| {
                let n = c.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n <= failures {
                        Err(TestError::Retryable(n))
                    } else {
                        Ok(n)
                    }
                }
            });

            let mut service = RetryLayer::<TestError>::builder()
                .max_attempts(max_attempts)
                .delay(Duration::from_millis(250))
                .retry_on(|e| matches!(e, TestError::Retryable(_)))
                .build()
                .layer(svc);

            let result = service.ready().await.unwrap().call(()).await;
            let made = calls.load(Ordering::SeqCst);

            if failures < max_attempts {
                prop_assert_eq!(result, Ok(failures + 1));
                prop_assert_eq!(made, failures + 1);
            } else {
                prop_assert_eq!(result, Err(TestError::Retryable(max_attempts)));
                prop_assert_eq!(made, max_attempts);
            }
            Ok(())
        })?;
    }

    /// Property: a failure rejected by the filter stops retrying at once
    #[test]
    fn fatal_error_stops_retries(
        max_attempts in 1usize..=10,
        fatal_on in 1usize..=10,
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            let calls = Arc::new(AtomicUsize::new(0));
            let c = Arc::clone(&calls);
            let svc = tower::service_fn(move |_req: ()| {
                let n = c.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n == fatal_on {
                        Err::<(), _>(TestError::Fatal(n))
                    } else {
                        Err(TestError::Retryable(n))
                    }
                }
            });

            let mut service = RetryLayer::<TestError>::builder()
                .max_attempts(max_attempts)
                .delay(Duration::from_millis(1))
                .retry_on(|e| matches!(e, TestError::Retryable(_)))
                .build()
                .layer(svc);

            let result = service.ready().await.unwrap().call(()).await;

            prop_assert!(result.is_err());
            let made = calls.load(Ordering::SeqCst);
            prop_assert_eq!(made, fatal_on.min(max_attempts));
            Ok(())
        })?;
    }
}
