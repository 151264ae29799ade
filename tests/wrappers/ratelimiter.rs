use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tower::{Layer, Service, ServiceExt};
use tower_decorate_core::sync_fn;
use tower_decorate_ratelimiter::{RateLimiterLayer, WindowType};

fn limiter(window_type: WindowType) -> RateLimiterLayer {
    RateLimiterLayer::builder()
        .name("quotes")
        .max_per_interval(2)
        .interval(Duration::from_secs(1))
        .window_type(window_type)
        .build()
}

/// Operation recording when each invocation starts.
fn stamped(
    start: Instant,
) -> (
    Arc<Mutex<Vec<Duration>>>,
    impl Service<u32, Response = u32, Error = Infallible, Future = futures::future::Ready<Result<u32, Infallible>>>
        + Clone
        + Send
        + 'static,
) {
    let stamps = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&stamps);
    let operation = sync_fn(move |n: u32| {
        s.lock().unwrap().push(start.elapsed());
        Ok::<_, Infallible>(n)
    });
    (stamps, operation)
}

#[tokio::test(start_paused = true)]
async fn ten_calls_at_two_per_second_take_four_and_a_half_seconds() {
    let start = Instant::now();
    let (_, operation) = stamped(start);
    let mut service = limiter(WindowType::Smooth).layer(operation);

    for n in 0..10 {
        service.ready().await.unwrap().call(n).await.unwrap();
    }

    assert!(start.elapsed() >= Duration::from_millis(4500));
}

#[tokio::test(start_paused = true)]
async fn no_interval_admits_more_than_the_maximum() {
    for window_type in [WindowType::Smooth, WindowType::Fixed] {
        let start = Instant::now();
        let (stamps, operation) = stamped(start);
        let mut service = limiter(window_type).layer(operation);

        for n in 0..9 {
            service.ready().await.unwrap().call(n).await.unwrap();
        }

        let stamps = stamps.lock().unwrap();
        for (i, &at) in stamps.iter().enumerate() {
            let in_window = stamps[i..]
                .iter()
                .take_while(|&&later| later < at + Duration::from_secs(1))
                .count();
            assert!(
                in_window <= 2,
                "{:?}: {} calls within 1s of {:?}",
                window_type,
                in_window,
                at
            );
        }
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_callers_are_paced_together() {
    let start = Instant::now();
    let (stamps, operation) = stamped(start);
    let service = limiter(WindowType::Smooth).layer(operation);

    let handles: Vec<_> = (0..6)
        .map(|n| {
            let svc = service.clone();
            tokio::spawn(async move { svc.oneshot(n).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let mut stamps = stamps.lock().unwrap().clone();
    stamps.sort();
    assert_eq!(stamps.len(), 6);
    assert!(stamps[5] >= Duration::from_millis(2500), "stamps {:?}", stamps);
}

#[tokio::test(start_paused = true)]
async fn wait_time_is_reported() {
    let waits = Arc::new(Mutex::new(Vec::new()));
    let w = Arc::clone(&waits);
    let mut service = RateLimiterLayer::builder()
        .max_per_interval(1)
        .interval(Duration::from_millis(100))
        .on_permit_acquired(move |wait| w.lock().unwrap().push(wait))
        .build()
        .layer(sync_fn(|_: ()| Ok::<_, Infallible>(())));

    for _ in 0..3 {
        service.ready().await.unwrap().call(()).await.unwrap();
    }

    assert_eq!(
        *waits.lock().unwrap(),
        vec![
            Duration::ZERO,
            Duration::from_millis(100),
            Duration::from_millis(100)
        ]
    );
}
