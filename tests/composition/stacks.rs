use super::{flaky, Flaky};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::{Layer, Service, ServiceBuilder, ServiceExt};
use tower_decorate_calllog::CallLogLayer;
use tower_decorate_counter::CallCounterLayer;
use tower_decorate_memo::MemoLayer;
use tower_decorate_notify::{Credential, FnSink, NotificationMessage, NotifierLayer};
use tower_decorate_ratelimiter::RateLimiterLayer;
use tower_decorate_retry::RetryLayer;
use tower_decorate_timer::TimerLayer;

#[tokio::test(start_paused = true)]
async fn notifier_outside_retry_reports_only_terminal_failure() {
    let reports = Arc::new(Mutex::new(Vec::new()));
    let r = Arc::clone(&reports);
    let sink = FnSink::new(move |message: &NotificationMessage, _: &Credential| {
        r.lock().unwrap().push(message.body.clone());
        Ok(())
    });

    let calls = Arc::new(AtomicUsize::new(0));
    let service = ServiceBuilder::new()
        .layer(
            NotifierLayer::builder(sink)
                .from("a@example.com")
                .to("b@example.com")
                .name("lookup")
                .build(),
        )
        .layer(
            RetryLayer::<Flaky>::builder()
                .max_attempts(3)
                .delay(Duration::from_millis(10))
                .build(),
        )
        .service(flaky(usize::MAX, 0, Arc::clone(&calls)));

    let err = service.oneshot("k".to_string()).await.unwrap_err();

    assert_eq!(err.into_original(), Flaky(3));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let reports = reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].starts_with("Error: attempt 3 failed"));
}

#[tokio::test(start_paused = true)]
async fn full_stack_preserves_contract() {
    let calls = Arc::new(AtomicUsize::new(0));
    let operation = flaky(1, 5, Arc::clone(&calls));

    let counted = CallCounterLayer::builder().name("stack").build().layer(operation);
    let count = counted.count();

    let mut service = ServiceBuilder::new()
        .layer(TimerLayer::builder().name("stack").build())
        .layer(CallLogLayer::builder().name("stack").build())
        .layer(MemoLayer::<String>::builder().name("stack").build())
        .layer(
            RetryLayer::<Flaky>::builder()
                .max_attempts(2)
                .delay(Duration::from_millis(10))
                .build(),
        )
        .layer(
            RateLimiterLayer::builder()
                .name("stack")
                .max_per_interval(10)
                .interval(Duration::from_secs(1))
                .build(),
        )
        .service(counted);

    let first = service
        .ready()
        .await
        .unwrap()
        .call("hello".to_string())
        .await;
    let second = service
        .ready()
        .await
        .unwrap()
        .call("hello".to_string())
        .await;

    assert_eq!(first, Ok(5));
    assert_eq!(second, Ok(5));
    // One failed attempt, one successful one, then a memo replay.
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(count.get(), 2);
}
