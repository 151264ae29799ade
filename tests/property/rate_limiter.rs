//! Property tests for the rate limiter.
//!
//! Invariants tested:
//! - No window of length `interval` holds more than `max_per_interval` admissions
//! - Sequential calls take at least the minimum pacing time
//! - Every call is admitted eventually (blocking, never rejecting)

use super::paused_runtime;
use proptest::prelude::*;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tower::{Layer, Service, ServiceExt};
use tower_decorate_core::sync_fn;
use tower_decorate_ratelimiter::{RateLimiterLayer, WindowType};

fn window_type() -> impl Strategy<Value = WindowType> {
    prop_oneof![Just(WindowType::Smooth), Just(WindowType::Fixed)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    /// Property: admissions never exceed the rate in any interval-long window
    #[test]
    fn never_exceeds_rate(
        max in 1u32..=10,
        interval_ms in 10u64..=1000,
        num_calls in 1usize..=60,
        window_type in window_type(),
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            let interval = Duration::from_millis(interval_ms);
            let start = Instant::now();
            let stamps = Arc::new(Mutex::new(Vec::new()));
            let s = Arc::clone(&stamps);

            let mut service = RateLimiterLayer::builder()
                .max_per_interval(max)
                .interval(interval)
                .window_type(window_type)
                .build()
                .layer(sync_fn(move |_: ()| {
                    s.lock().unwrap().push(start.elapsed());
                    Ok::<_, Infallible>(())
                }));

            for _ in 0..num_calls {
                service.ready().await.unwrap().call(()).await.unwrap();
            }

            let stamps = stamps.lock().unwrap();
            prop_assert_eq!(stamps.len(), num_calls);
            for (i, &at) in stamps.iter().enumerate() {
                let in_window = stamps[i..]
                    .iter()
                    .take_while(|&&later| later < at + interval)
                    .count();
                prop_assert!(
                    in_window <= max as usize,
                    "{} admissions within {:?} of {:?}",
                    in_window,
                    interval,
                    at
                );
            }

            // The last admission can come no earlier than the pacing allows.
            let full_intervals = (num_calls as u32 - 1) / max;
            prop_assert!(stamps[num_calls - 1] >= interval * full_intervals);
            Ok(())
        })?;
    }
}
