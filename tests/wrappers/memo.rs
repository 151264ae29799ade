use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::util::BoxCloneService;
use tower::{Layer, Service, ServiceExt};
use tower_decorate_core::sync_fn;
use tower_decorate_memo::{MemoLayer, MemoStore, Memoize};

type Fib = Memoize<BoxCloneService<u64, u64, Infallible>, u64, u64, u64>;

/// Fibonacci whose recursive calls go back through the memoized binding.
fn memoized_fib(calls: Arc<AtomicUsize>) -> Fib {
    let slot: Arc<Mutex<Option<Fib>>> = Arc::new(Mutex::new(None));
    let s = Arc::clone(&slot);

    let operation = tower::service_fn(move |n: u64| {
        calls.fetch_add(1, Ordering::SeqCst);
        let slot = Arc::clone(&s);
        async move {
            if n <= 1 {
                return Ok::<_, Infallible>(n);
            }
            let fib = slot.lock().unwrap().clone().unwrap();
            let a = fib.clone().oneshot(n - 1).await?;
            let b = fib.oneshot(n - 2).await?;
            Ok(a + b)
        }
    });

    let service = MemoLayer::<u64>::builder()
        .name("fib")
        .build()
        .layer(BoxCloneService::new(operation));
    *slot.lock().unwrap() = Some(service.clone());
    service
}

#[tokio::test]
async fn recursive_definition_runs_once_per_argument() {
    let calls = Arc::new(AtomicUsize::new(0));
    let fib = memoized_fib(Arc::clone(&calls));

    let result = fib.clone().oneshot(30).await.unwrap();

    assert_eq!(result, 832_040);
    assert_eq!(calls.load(Ordering::SeqCst), 31);
    assert_eq!(fib.store().len(), 31);

    // Every argument is now stored.
    assert_eq!(fib.clone().oneshot(25).await.unwrap(), 75_025);
    assert_eq!(calls.load(Ordering::SeqCst), 31);
}

#[tokio::test]
async fn synchronous_operation_is_memoized() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let mut service = MemoLayer::<(u32, u32)>::builder()
        .build()
        .layer(sync_fn(move |(a, b): (u32, u32)| {
            c.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Infallible>(a.pow(b))
        }));

    for _ in 0..3 {
        assert_eq!(service.ready().await.unwrap().call((2, 10)).await, Ok(1024));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn key_extractor_narrows_identity() {
    #[derive(Clone)]
    struct Lookup {
        id: u32,
        trace_id: u64,
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let mut service = MemoLayer::<Lookup>::builder()
        .key_extractor(|req: &Lookup| req.id)
        .build()
        .layer(tower::service_fn(move |req: Lookup| {
            c.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, Infallible>(req.trace_id) }
        }));

    let first = service
        .ready()
        .await
        .unwrap()
        .call(Lookup { id: 1, trace_id: 10 })
        .await
        .unwrap();
    let second = service
        .ready()
        .await
        .unwrap()
        .call(Lookup { id: 1, trace_id: 20 })
        .await
        .unwrap();

    // Same key, so the second request replays the first result.
    assert_eq!(first, 10);
    assert_eq!(second, 10);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn shared_store_spans_bindings() {
    let store: MemoStore<u32, u32> = MemoStore::new();
    let layer = MemoLayer::<u32>::builder().build().shared(store.clone());

    let calls = Arc::new(AtomicUsize::new(0));
    let c1 = Arc::clone(&calls);
    let c2 = Arc::clone(&calls);
    let a = layer.layer(tower::service_fn(move |n: u32| {
        c1.fetch_add(1, Ordering::SeqCst);
        async move { Ok::<_, Infallible>(n * 10) }
    }));
    let b = layer.layer(tower::service_fn(move |n: u32| {
        c2.fetch_add(1, Ordering::SeqCst);
        async move { Ok::<_, Infallible>(n * 10) }
    }));

    assert_eq!(a.oneshot(4).await.unwrap(), 40);
    assert_eq!(b.oneshot(4).await.unwrap(), 40);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.get(&4), Some(40));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_agree_on_one_value() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);

    // Each invocation returns a distinct value, so disagreement would show.
    let service = MemoLayer::<u32>::builder()
        .build()
        .layer(tower::service_fn(move |_: u32| {
            let n = c.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok::<_, Infallible>(n)
            }
        }));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let svc = service.clone();
            tokio::spawn(async move { svc.oneshot(7).await.unwrap() })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    let stored = service.store().get(&7).unwrap();
    assert!(results.iter().all(|&r| r == stored), "results {:?}", results);
    assert!(calls.load(Ordering::SeqCst) >= 1);
    assert_eq!(service.store().len(), 1);
}
