use super::support::LogCapture;
use std::convert::Infallible;
use tower::{Layer, Service, ServiceExt};
use tower_decorate_core::sync_fn;
use tower_decorate_counter::CallCounterLayer;

#[tokio::test]
async fn count_increments_once_per_call() {
    let mut service = CallCounterLayer::builder()
        .name("tick")
        .build()
        .layer(sync_fn(|_: ()| Ok::<_, Infallible>(())));
    let count = service.count();

    for expected in 1..=4 {
        service.ready().await.unwrap().call(()).await.unwrap();
        assert_eq!(count.get(), expected);
    }
}

#[tokio::test]
async fn clones_share_the_count() {
    let service = CallCounterLayer::builder()
        .build()
        .layer(tower::service_fn(|n: u32| async move { Ok::<_, Infallible>(n) }));
    let count = service.count();

    service.clone().oneshot(1).await.unwrap();
    service.clone().oneshot(2).await.unwrap();

    assert_eq!(count.get(), 2);
    assert_eq!(service.count().get(), 2);
}

#[tokio::test]
async fn success_is_logged_failure_is_not() {
    let capture = LogCapture::default();
    let _guard = capture.install();

    let mut service = CallCounterLayer::builder()
        .name("maybe")
        .build()
        .layer(sync_fn(|ok: bool| if ok { Ok(()) } else { Err("nope") }));

    service.ready().await.unwrap().call(true).await.unwrap();
    service.ready().await.unwrap().call(false).await.unwrap_err();
    service.ready().await.unwrap().call(true).await.unwrap();

    let lines = capture.lines();
    assert_eq!(lines.len(), 2, "lines {:?}", lines);
    assert!(lines[0].contains("maybe has been called 1 times"));
    assert!(lines[1].contains("maybe has been called 3 times"));
    assert_eq!(service.count().get(), 3);
}
